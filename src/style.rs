//! # Style Resolution
//!
//! Pure appearance computation for rendered pool edges.
//!
//! ## Overview
//!
//! `StyleResolver` maps a canonical pool edge plus the current visibility
//! filter and highlight overlay to a rendered [`Appearance`]. It never
//! mutates canonical entities and always scales from the edge's canonical
//! base width, so resolving the same inputs any number of times yields the
//! same output.
//!
//! ## Precedence
//!
//! 1. Highlighted edges render emphasized: canonical protocol color (even if
//!    that protocol is currently deselected), width scaled up, no dashes.
//! 2. Edges of a deselected protocol render muted: fixed gray, reduced
//!    opacity, width scaled down, dashed.
//! 3. Everything else renders canonical.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::GraphError;
use crate::filter::VisibilityFilter;
use crate::highlight::HighlightOverlay;
use crate::pools::{PoolEdge, Protocol};
use crate::settings::StyleSettings;

/// Built-in canonical protocol color table.
pub static DEFAULT_PROTOCOL_COLORS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("uniswap_v2", "#ff007a"),
        ("uniswap_v3", "#fc72ff"),
        ("sushiswap", "#0993ec"),
        ("balancer", "#536dfe"),
        ("curve", "#a5a4ce"),
    ]
});

/// Resolved visual appearance of a rendered edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub color: String,
    pub width: f64,
    pub dashes: bool,
    pub opacity: f64,
}

/// Static `protocol → color` mapping, loaded once from settings.
#[derive(Debug, Clone)]
pub struct ProtocolStyle {
    colors: std::collections::HashMap<String, String>,
    fallback_color: String,
}

impl ProtocolStyle {
    pub fn from_settings(settings: &StyleSettings) -> Self {
        Self {
            colors: settings.protocol_colors.clone(),
            fallback_color: settings.fallback_color.clone(),
        }
    }

    /// Canonical color for a protocol.
    pub fn color_of(&self, protocol: &Protocol) -> Result<&str, GraphError> {
        self.colors
            .get(protocol.as_str())
            .map(String::as_str)
            .ok_or_else(|| GraphError::UnknownProtocol(protocol.clone()))
    }

    /// Canonical color, degrading to the fallback for unmapped protocols.
    ///
    /// The miss is logged for operator visibility; it never aborts ingestion
    /// of otherwise valid data.
    pub fn color_or_fallback(&self, protocol: &Protocol) -> &str {
        match self.color_of(protocol) {
            Ok(color) => color,
            Err(_) => {
                warn!(
                    "No color mapping for protocol '{}', using fallback {}",
                    protocol, self.fallback_color
                );
                &self.fallback_color
            }
        }
    }

    pub fn knows(&self, protocol: &Protocol) -> bool {
        self.colors.contains_key(protocol.as_str())
    }
}

impl Default for ProtocolStyle {
    fn default() -> Self {
        Self::from_settings(&StyleSettings::default())
    }
}

/// Pure function from (canonical edge, filter, overlay) to appearance.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    protocol_style: ProtocolStyle,
    muted_color: String,
    muted_opacity: f64,
    muted_width_factor: f64,
    highlight_width_factor: f64,
}

impl StyleResolver {
    pub fn from_settings(settings: &StyleSettings) -> Self {
        Self {
            protocol_style: ProtocolStyle::from_settings(settings),
            muted_color: settings.muted_color.clone(),
            muted_opacity: settings.muted_opacity,
            muted_width_factor: settings.muted_width_factor,
            highlight_width_factor: settings.highlight_width_factor,
        }
    }

    pub fn protocol_style(&self) -> &ProtocolStyle {
        &self.protocol_style
    }

    /// Resolve the rendered appearance of `edge`.
    ///
    /// Width factors always apply to the edge's canonical base width, so
    /// repeated resolution never compounds scaling.
    pub fn resolve(
        &self,
        edge: &PoolEdge,
        filter: &VisibilityFilter,
        overlay: &HighlightOverlay,
    ) -> Appearance {
        if overlay.contains_edge(&edge.id) {
            // A highlighted route is never grayed out, even when its
            // protocol is deselected.
            return Appearance {
                color: self.protocol_style.color_or_fallback(&edge.protocol).to_string(),
                width: edge.width * self.highlight_width_factor,
                dashes: false,
                opacity: 1.0,
            };
        }

        if !filter.is_protocol_selected(&edge.protocol) {
            return Appearance {
                color: self.muted_color.clone(),
                width: edge.width * self.muted_width_factor,
                dashes: true,
                opacity: self.muted_opacity,
            };
        }

        Appearance {
            color: self.protocol_style.color_or_fallback(&edge.protocol).to_string(),
            width: edge.width,
            dashes: false,
            opacity: 1.0,
        }
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::from_settings(&StyleSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::PoolId;

    fn edge() -> PoolEdge {
        PoolEdge::new("p1", "a", "b", "uniswap_v2", 2.0, 3.0)
    }

    fn filter_with_protocol(name: &str) -> VisibilityFilter {
        let mut filter = VisibilityFilter::default();
        filter.select_protocol(Protocol::from(name));
        filter
    }

    #[test]
    fn test_canonical_appearance() {
        let resolver = StyleResolver::default();
        let appearance = resolver.resolve(
            &edge(),
            &filter_with_protocol("uniswap_v2"),
            &HighlightOverlay::default(),
        );

        assert_eq!(appearance.color, "#ff007a");
        assert_eq!(appearance.width, 3.0);
        assert!(!appearance.dashes);
        assert_eq!(appearance.opacity, 1.0);
    }

    #[test]
    fn test_deselected_protocol_renders_muted() {
        let resolver = StyleResolver::default();
        let appearance = resolver.resolve(
            &edge(),
            &filter_with_protocol("sushiswap"),
            &HighlightOverlay::default(),
        );

        assert_eq!(appearance.color, "#c8c8c8");
        assert_eq!(appearance.width, 3.0 * 0.7);
        assert!(appearance.dashes);
        assert_eq!(appearance.opacity, 0.3);
    }

    #[test]
    fn test_highlight_takes_precedence_over_muting() {
        let resolver = StyleResolver::default();
        let mut overlay = HighlightOverlay::default();
        overlay.highlight_edge(PoolId::from("p1"));

        // Protocol deselected, edge highlighted: canonical color wins.
        let appearance = resolver.resolve(&edge(), &filter_with_protocol("sushiswap"), &overlay);

        assert_eq!(appearance.color, "#ff007a");
        assert_eq!(appearance.width, 30.0);
        assert!(!appearance.dashes);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = StyleResolver::default();
        let edge = edge();
        let filter = filter_with_protocol("uniswap_v2");
        let overlay = HighlightOverlay::default();

        let first = resolver.resolve(&edge, &filter, &overlay);
        for _ in 0..50 {
            // No cumulative width shrinkage across repeated calls.
            assert_eq!(resolver.resolve(&edge, &filter, &overlay), first);
        }
    }

    #[test]
    fn test_unknown_protocol_degrades_to_fallback() {
        let resolver = StyleResolver::default();
        let mystery = PoolEdge::new("p2", "a", "b", "mystery_swap", 1.0, 1.0);
        let mut filter = VisibilityFilter::default();
        filter.select_protocol(Protocol::from("mystery_swap"));

        let appearance = resolver.resolve(&mystery, &filter, &HighlightOverlay::default());

        assert_eq!(appearance.color, "#848484");
        assert!(resolver
            .protocol_style()
            .color_of(&Protocol::from("mystery_swap"))
            .is_err());
    }
}
