//! Tooltip Controller: a headless state machine for the shared definition
//! panel.
//!
//! The controller consumes typed events carrying marker identity and
//! geometry and emits typed actions (`Show`, `Hide`, `Move`, ARIA set/clear)
//! that a host applies to its UI. It owns no DOM: the WASM bridge and the
//! test harness are both hosts.
//!
//! States are `Hidden` and `Shown(marker)`. At most one marker is active;
//! activating a new marker emits the previous marker's teardown actions
//! before the new marker's setup actions in the same batch. Re-activating
//! the shown marker is a no-op.

use percent_encoding::percent_decode_str;

use crate::index::TermIndex;

/// Fixed tooltip panel width in CSS pixels.
pub const PANEL_WIDTH: f64 = 300.0;
/// Gap between the marker box and the panel.
pub const PANEL_GAP: f64 = 8.0;
/// Minimum distance kept from the viewport edges.
pub const VIEWPORT_MARGIN: f64 = 16.0;
/// Viewports at or below this width use docked placement (host CSS).
pub const DOCK_BREAKPOINT: f64 = 768.0;
/// Grace delay before hiding after the pointer leaves marker and panel,
/// allowing pointer travel between the two.
pub const HIDE_GRACE_MS: u64 = 100;
/// Trailing-edge throttle for scroll repositioning.
pub const SCROLL_THROTTLE_MS: u64 = 100;

/// How the device drives transitions. Fixed at construction: a hover
/// controller ignores nothing but taps still pin (desktop click), while a
/// touch controller ignores pointer hover events entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    Hover,
    Touch,
}

/// Marker bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    any(feature = "cli", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Viewport metrics at event time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    any(feature = "cli", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

/// Identity and geometry of an activated marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// The marker's `data-ref` value.
    pub ref_id: String,
    /// The marker's slug, or its raw href (`#term-<slug>`, possibly
    /// percent-encoded).
    pub slug: String,
    pub rect: Rect,
}

/// Computed panel placement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    any(feature = "cli", feature = "wasm"),
    derive(serde::Serialize),
    serde(tag = "kind")
)]
pub enum Placement {
    /// Right of the marker (preferred).
    Right { left: f64, top: f64 },
    /// Left of the marker (right side too narrow).
    Left { left: f64, top: f64 },
    /// Horizontally centered on the marker, clamped to the margins.
    Centered { left: f64, top: f64 },
    /// Narrow viewport; the host's stylesheet positions the panel.
    Docked,
}

/// An effect the host must apply.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(feature = "cli", feature = "wasm"),
    derive(serde::Serialize),
    serde(tag = "action")
)]
pub enum Action {
    /// Populate and show the panel.
    Show {
        ref_id: String,
        term: String,
        ordinal: u32,
        definition: String,
        placement: Placement,
    },
    /// Reposition the panel without content changes.
    Move { placement: Placement },
    /// Hide the panel.
    Hide,
    /// Establish `aria-describedby` from the marker to the panel.
    SetAria { ref_id: String, panel_id: String },
    /// Tear down the marker's ARIA linkage.
    ClearAria { ref_id: String },
}

#[derive(Debug, Clone)]
enum State {
    Hidden,
    Shown { marker: Marker, pinned: bool },
}

/// The tooltip state machine.
pub struct TooltipController {
    index: TermIndex,
    panel_id: String,
    mode: DeviceMode,
    state: State,
    viewport: Viewport,
    pending_hide: Option<u64>,
    pending_move: Option<u64>,
}

impl TooltipController {
    pub fn new(index: TermIndex, panel_id: impl Into<String>, mode: DeviceMode) -> Self {
        Self {
            index,
            panel_id: panel_id.into(),
            mode,
            state: State::Hidden,
            viewport: Viewport::default(),
            pending_hide: None,
            pending_move: None,
        }
    }

    /// The currently shown marker's `data-ref`, if any.
    pub fn shown_ref(&self) -> Option<&str> {
        match &self.state {
            State::Shown { marker, .. } => Some(&marker.ref_id),
            State::Hidden => None,
        }
    }

    /// Pointer entered a marker (hover devices only).
    pub fn pointer_enter(&mut self, marker: Marker, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        if self.mode != DeviceMode::Hover {
            return Vec::new();
        }
        match &self.state {
            State::Shown { pinned: true, .. } => Vec::new(),
            State::Shown { marker: shown, .. } if shown.ref_id == marker.ref_id => {
                // Re-activation of the shown marker: keep it open, change nothing.
                self.pending_hide = None;
                Vec::new()
            }
            _ => self.activate(marker, false),
        }
    }

    /// Pointer left the shown marker (hover devices only).
    pub fn pointer_leave_marker(&mut self, now: u64) -> Vec<Action> {
        self.schedule_hide(now);
        Vec::new()
    }

    /// Pointer entered the panel, cancelling a pending grace hide.
    pub fn pointer_enter_panel(&mut self) -> Vec<Action> {
        if self.mode == DeviceMode::Hover && matches!(self.state, State::Shown { .. }) {
            self.pending_hide = None;
        }
        Vec::new()
    }

    /// Pointer left the panel (hover devices only).
    pub fn pointer_leave_panel(&mut self, now: u64) -> Vec<Action> {
        self.schedule_hide(now);
        Vec::new()
    }

    /// Tap or click on a marker (`Some`) or outside marker and panel
    /// (`None`). Clicks pin the panel open on hover devices too.
    pub fn tap(&mut self, marker: Option<Marker>, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        match marker {
            Some(marker) => match &self.state {
                State::Shown { marker: shown, .. } if shown.ref_id == marker.ref_id => {
                    // Direct tap on the shown marker dismisses it.
                    self.hide_now()
                }
                _ => self.activate(marker, true),
            },
            None => self.hide_now(),
        }
    }

    /// Explicit dismiss key.
    pub fn dismiss(&mut self) -> Vec<Action> {
        self.hide_now()
    }

    /// Scroll event: coalesced into a single trailing-edge reposition.
    pub fn scrolled(&mut self, viewport: Viewport, now: u64) -> Vec<Action> {
        self.viewport = viewport;
        if matches!(self.state, State::Shown { .. }) {
            self.pending_move = Some(now + SCROLL_THROTTLE_MS);
        }
        Vec::new()
    }

    /// Resize event: reposition immediately.
    pub fn resized(&mut self, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        self.reposition().into_iter().collect()
    }

    /// Advance the clock: fires a grace-delayed hide or a throttled
    /// reposition whose deadline has passed.
    pub fn tick(&mut self, now: u64) -> Vec<Action> {
        let mut actions = Vec::new();

        if self.pending_hide.is_some_and(|deadline| now >= deadline) {
            actions.extend(self.hide_now());
        }

        if self.pending_move.is_some_and(|deadline| now >= deadline) {
            self.pending_move = None;
            actions.extend(self.reposition());
        }

        actions
    }

    /// Recompute the shown panel's placement from the marker's stored
    /// document-absolute rect and the current viewport.
    fn reposition(&self) -> Option<Action> {
        match &self.state {
            State::Shown { marker, .. } => {
                let rect = Rect {
                    top: marker.rect.top - self.viewport.scroll_y,
                    ..marker.rect
                };
                Some(Action::Move {
                    placement: compute_placement(rect, self.viewport),
                })
            }
            State::Hidden => None,
        }
    }

    fn activate(&mut self, marker: Marker, pinned: bool) -> Vec<Action> {
        // Resolve first: an unresolvable slug is a silent no-op and must
        // not tear down a panel that is already showing something valid.
        let Some(entry) = resolve_slug(&self.index, &marker.slug) else {
            return Vec::new();
        };
        let (term, ordinal, definition) = (
            entry.display.clone(),
            entry.ordinal,
            entry.definition.clone(),
        );

        let mut actions = Vec::new();
        if let State::Shown { marker: prev, .. } = &self.state {
            actions.push(Action::ClearAria {
                ref_id: prev.ref_id.clone(),
            });
        }

        let placement = compute_placement(marker.rect, self.viewport);
        actions.push(Action::Show {
            ref_id: marker.ref_id.clone(),
            term,
            ordinal,
            definition,
            placement,
        });
        actions.push(Action::SetAria {
            ref_id: marker.ref_id.clone(),
            panel_id: self.panel_id.clone(),
        });

        // The viewport-relative rect goes stale as soon as the page
        // scrolls; anchor the stored copy in document coordinates so
        // later repositioning stays on the marker.
        let mut marker = marker;
        marker.rect.top += self.viewport.scroll_y;
        self.state = State::Shown { marker, pinned };
        self.pending_hide = None;
        actions
    }

    fn hide_now(&mut self) -> Vec<Action> {
        self.pending_hide = None;
        self.pending_move = None;
        match std::mem::replace(&mut self.state, State::Hidden) {
            State::Shown { marker, .. } => vec![
                Action::ClearAria { ref_id: marker.ref_id },
                Action::Hide,
            ],
            State::Hidden => Vec::new(),
        }
    }

    fn schedule_hide(&mut self, now: u64) {
        if self.mode != DeviceMode::Hover {
            return;
        }
        if let State::Shown { pinned: false, .. } = self.state {
            self.pending_hide = Some(now + HIDE_GRACE_MS);
        }
    }
}

/// Resolve a marker slug (or raw `#term-<slug>` href, possibly
/// percent-encoded) against the index.
fn resolve_slug<'a>(
    index: &'a TermIndex,
    slug: &str,
) -> Option<&'a crate::index::TermEntry> {
    let decoded = percent_decode_str(slug).decode_utf8().ok()?;
    // Full hrefs carry the anchor prefix; bare data-term slugs do not.
    let slug = match decoded.strip_prefix('#') {
        Some(fragment) => fragment.strip_prefix("term-")?,
        None => &decoded,
    };
    index.by_slug(slug)
}

/// Panel placement: prefer right of the marker, fall back to the left,
/// center (clamped) as a last resort; docked on narrow viewports.
pub fn compute_placement(rect: Rect, viewport: Viewport) -> Placement {
    if viewport.width <= DOCK_BREAKPOINT {
        return Placement::Docked;
    }

    let space_right = viewport.width - rect.right() - VIEWPORT_MARGIN;
    let space_left = rect.left - VIEWPORT_MARGIN;
    let top = rect.top + viewport.scroll_y;

    if space_right >= PANEL_WIDTH {
        Placement::Right {
            left: rect.right() + PANEL_GAP,
            top,
        }
    } else if space_left > PANEL_WIDTH {
        Placement::Left {
            left: rect.left - PANEL_WIDTH - PANEL_GAP,
            top,
        }
    } else {
        let centered = rect.left + (rect.width - PANEL_WIDTH) / 2.0;
        let max_left = viewport.width - PANEL_WIDTH - VIEWPORT_MARGIN;
        Placement::Centered {
            left: centered.clamp(VIEWPORT_MARGIN, max_left),
            top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_viewport() -> Viewport {
        Viewport {
            width: 1200.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }

    fn rect_at(left: f64) -> Rect {
        Rect {
            left,
            top: 40.0,
            width: 60.0,
            height: 18.0,
        }
    }

    #[test]
    fn test_placement_prefers_right() {
        let p = compute_placement(rect_at(100.0), wide_viewport());
        assert_eq!(p, Placement::Right { left: 168.0, top: 40.0 });
    }

    #[test]
    fn test_placement_falls_back_left() {
        // marker near the right edge: right space < 300, left space > 300
        let p = compute_placement(rect_at(1000.0), wide_viewport());
        assert_eq!(p, Placement::Left { left: 692.0, top: 40.0 });
    }

    #[test]
    fn test_placement_centers_and_clamps() {
        let narrow = Viewport {
            width: 800.0,
            height: 600.0,
            scroll_y: 0.0,
        };
        // neither side has 300px free
        let p = compute_placement(
            Rect {
                left: 300.0,
                top: 40.0,
                width: 200.0,
                height: 18.0,
            },
            narrow,
        );
        match p {
            Placement::Centered { left, .. } => {
                assert!((VIEWPORT_MARGIN..=narrow.width - PANEL_WIDTH - VIEWPORT_MARGIN)
                    .contains(&left));
            }
            other => panic!("expected centered placement, got {other:?}"),
        }
    }

    #[test]
    fn test_placement_docked_on_narrow_viewport() {
        let mobile = Viewport {
            width: 390.0,
            height: 844.0,
            scroll_y: 120.0,
        };
        assert_eq!(compute_placement(rect_at(20.0), mobile), Placement::Docked);
    }

    #[test]
    fn test_placement_adds_scroll_offset() {
        let scrolled = Viewport {
            scroll_y: 500.0,
            ..wide_viewport()
        };
        let p = compute_placement(rect_at(100.0), scrolled);
        assert_eq!(p, Placement::Right { left: 168.0, top: 540.0 });
    }
}
