//! Event types and sinks for observing cutting runs.
//!
//! This module defines [`CutEvent`] and a set of sinks to emit, collect, or forward events while
//! executing [`crate::cut::runner::cut_puzzle_with_events`] or
//! [`crate::cut::runner::JigsawCutter::cut_with_events`].
use glam::Vec2;

use crate::cut::config::CutConfig;
use crate::edge::PieceEdges;
use crate::piece::CanvasOffset;
use crate::raster::PixelRect;

/// Describes events emitted while cutting a puzzle.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum CutEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// The configuration used.
        config: CutConfig,
        /// Seed driving the edge shapes.
        seed: u64,
        /// Source image size in pixels.
        image_size: (u32, u32),
    },

    /// Emitted once the edge plan for the whole grid exists.
    EdgesPlanned {
        cols: u32,
        rows: u32,
    },

    /// Emitted after a piece's texture was cut out of the source image.
    PieceCut {
        col: u32,
        row: u32,
        edges: PieceEdges,
        canvas_offset: CanvasOffset,
        /// Source image rectangle that was cropped.
        crop: PixelRect,
        pivot: Vec2,
    },

    /// Emitted when the atlas was packed.
    AtlasPacked {
        /// Final atlas size.
        size: (u32, u32),
        /// Downscale factor applied, `1.0` if none.
        scale: f32,
        pieces: usize,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. piece coordinates).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`CutEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutEventKind {
    RunStarted,
    EdgesPlanned,
    PieceCut,
    AtlasPacked,
    Warning,
}

impl CutEvent {
    pub fn kind(&self) -> CutEventKind {
        match self {
            CutEvent::RunStarted { .. } => CutEventKind::RunStarted,
            CutEvent::EdgesPlanned { .. } => CutEventKind::EdgesPlanned,
            CutEvent::PieceCut { .. } => CutEventKind::PieceCut,
            CutEvent::AtlasPacked { .. } => CutEventKind::AtlasPacked,
            CutEvent::Warning { .. } => CutEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`CutEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: CutEvent);

    /// Returns `false` to skip building events of `kind`.
    #[inline]
    fn wants(&self, _kind: CutEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: CutEvent) {}

    #[inline]
    fn wants(&self, _kind: CutEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(CutEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(CutEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(CutEvent),
{
    #[inline]
    fn send(&mut self, event: CutEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<CutEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<CutEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[CutEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: CutEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: CutEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> CutEvent {
        CutEvent::Warning {
            context: "ctx".into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_and_counts() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning());
        sink.send(CutEvent::EdgesPlanned { cols: 1, rows: 1 });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(CutEventKind::Warning), 1);
        assert_eq!(sink.count(CutEventKind::PieceCut), 0);
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(CutEventKind::Warning));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning());
        assert_eq!(count, 1);
    }
}
