//! Particle transport state and loss bookkeeping.

use serde::Serialize;
use std::fmt;

/// One trajectory checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub s: f64,
    pub x: f64,
    pub px: f64,
}

/// Which surface of an element stopped the particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LossLocation {
    /// Outside the aperture at the element entrance.
    Start,
    /// Hit the aperture inside the element or at its exit.
    Down,
    StartExtraction,
    StartBlade,
    StartCollimator,
    StartCirculating,
    DownCirculating,
    DownExtraction,
    DownBladeCirculating,
    DownBladeExtraction,
    DownCollimatorCirculating,
    DownCollimatorExtraction,
}

impl LossLocation {
    /// Suffix used in loss labels.
    pub fn tag(&self) -> &'static str {
        match self {
            LossLocation::Start => "start",
            LossLocation::Down => "down",
            LossLocation::StartExtraction => "start_extr",
            LossLocation::StartBlade => "start_blade",
            LossLocation::StartCollimator => "start_coll",
            LossLocation::StartCirculating => "start_circ",
            LossLocation::DownCirculating => "down_circ",
            LossLocation::DownExtraction => "down_extr",
            LossLocation::DownBladeCirculating => "down_blade_circ",
            LossLocation::DownBladeExtraction => "down_blade_extr",
            LossLocation::DownCollimatorCirculating => "down_coll_circ",
            LossLocation::DownCollimatorExtraction => "down_coll_extr",
        }
    }

    pub fn is_entrance(&self) -> bool {
        matches!(
            self,
            LossLocation::Start
                | LossLocation::StartExtraction
                | LossLocation::StartBlade
                | LossLocation::StartCollimator
                | LossLocation::StartCirculating
        )
    }
}

/// Terminal cause of loss: the element that intercepted the particle and
/// where.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LossLabel {
    pub element: String,
    pub location: LossLocation,
}

impl fmt::Display for LossLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.element, self.location.tag())
    }
}

/// Whether the particle is still in flight
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LossStatus {
    #[default]
    Circulating,
    Lost(LossLabel),
}

impl LossStatus {
    pub const CIRCULATING_LABEL: &'static str = "CIRCULATING";

    pub fn is_lost(&self) -> bool {
        matches!(self, LossStatus::Lost(_))
    }

    pub fn label(&self) -> Option<&LossLabel> {
        match self {
            LossStatus::Circulating => None,
            LossStatus::Lost(label) => Some(label),
        }
    }
}

impl fmt::Display for LossStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossStatus::Circulating => f.write_str(Self::CIRCULATING_LABEL),
            LossStatus::Lost(label) => label.fmt(f),
        }
    }
}

impl Serialize for LossStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A particle tracked through a line.
///
/// `s`, `x` and `px` are mutated by element transport; the history can only
/// grow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub s: f64,
    pub x: f64,
    pub px: f64,
    pub status: LossStatus,
    history: Vec<Snapshot>,
}

impl Particle {
    pub fn new(x: f64, px: f64) -> Self {
        Self {
            s: 0.0,
            x,
            px,
            status: LossStatus::Circulating,
            history: vec![Snapshot { s: 0.0, x, px }],
        }
    }

    pub fn state(&self) -> Snapshot {
        Snapshot {
            s: self.s,
            x: self.x,
            px: self.px,
        }
    }

    /// Append the current state to the history
    pub fn record(&mut self) {
        let state = self.state();
        self.history.push(state);
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Initial conditions the particle was created with.
    pub fn start(&self) -> Snapshot {
        self.history[0]
    }

    pub fn is_lost(&self) -> bool {
        self.status.is_lost()
    }

    /// Mark the particle as lost on `element` at `location`.
    pub fn lose(&mut self, element: &str, location: LossLocation) {
        tracing::debug!(
            element,
            location = location.tag(),
            s = self.s,
            x = self.x,
            "particle lost"
        );
        self.status = LossStatus::Lost(LossLabel {
            element: element.to_string(),
            location,
        });
    }
}
