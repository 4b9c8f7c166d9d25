//! User-controlled visibility filter.
//!
//! Pure selection state: which tokens and which protocols are currently
//! chosen for display. Mutations are synchronous and have no side effects of
//! their own — callers notify the synchronizer explicitly, so batched
//! toggles (select-all) rebuild the view once instead of once per item.

use std::collections::HashSet;

use crate::pools::Protocol;
use crate::tokens::TokenId;

#[derive(Debug, Clone, Default)]
pub struct VisibilityFilter {
    selected_tokens: HashSet<TokenId>,
    selected_protocols: HashSet<Protocol>,
}

impl VisibilityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the token was newly selected.
    pub fn select_token(&mut self, id: TokenId) -> bool {
        self.selected_tokens.insert(id)
    }

    /// Returns true when the token was previously selected.
    pub fn deselect_token(&mut self, id: &TokenId) -> bool {
        self.selected_tokens.remove(id)
    }

    /// Selects every id in `ids`, returning the number newly selected.
    pub fn select_all_tokens<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = TokenId>,
    {
        ids.into_iter()
            .filter(|id| self.selected_tokens.insert(id.clone()))
            .count()
    }

    pub fn clear_tokens(&mut self) {
        self.selected_tokens.clear();
    }

    pub fn is_token_selected(&self, id: &TokenId) -> bool {
        self.selected_tokens.contains(id)
    }

    pub fn selected_tokens(&self) -> &HashSet<TokenId> {
        &self.selected_tokens
    }

    /// Returns true when the protocol was newly selected.
    pub fn select_protocol(&mut self, protocol: Protocol) -> bool {
        self.selected_protocols.insert(protocol)
    }

    /// Returns true when the protocol was previously selected.
    pub fn deselect_protocol(&mut self, protocol: &Protocol) -> bool {
        self.selected_protocols.remove(protocol)
    }

    pub fn select_all_protocols<I>(&mut self, protocols: I) -> usize
    where
        I: IntoIterator<Item = Protocol>,
    {
        protocols
            .into_iter()
            .filter(|p| self.selected_protocols.insert(p.clone()))
            .count()
    }

    pub fn clear_protocols(&mut self) {
        self.selected_protocols.clear();
    }

    pub fn is_protocol_selected(&self, protocol: &Protocol) -> bool {
        self.selected_protocols.contains(protocol)
    }

    pub fn selected_protocols(&self) -> &HashSet<Protocol> {
        &self.selected_protocols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_toggle_reports_membership_change() {
        let mut filter = VisibilityFilter::new();
        let id = TokenId::from("usdc");

        assert!(filter.select_token(id.clone()));
        assert!(!filter.select_token(id.clone()));
        assert!(filter.is_token_selected(&id));
        assert!(filter.deselect_token(&id));
        assert!(!filter.deselect_token(&id));
    }

    #[test]
    fn test_select_all_counts_only_new_members() {
        let mut filter = VisibilityFilter::new();
        filter.select_token(TokenId::from("a"));

        let added = filter.select_all_tokens(vec![
            TokenId::from("a"),
            TokenId::from("b"),
            TokenId::from("c"),
        ]);

        assert_eq!(added, 2);
        assert_eq!(filter.selected_tokens().len(), 3);
    }
}
