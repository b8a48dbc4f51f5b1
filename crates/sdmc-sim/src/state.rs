//! Drone runtime state and the action vocabulary.

use sdmc_core::{CarId, Point};

use crate::DynamicsState;

/// Whether the drone flies under its own power or rides a car.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DroneMode {
    Flying,
    Riding(CarId),
}

/// Physical state plus riding mode.
///
/// The car id only exists inside [`DroneMode::Riding`], so "riding" and
/// "has a car id" can never disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct SdmcState<S> {
    pub physical: S,
    mode:         DroneMode,
}

impl<S> SdmcState<S> {
    pub fn flying(physical: S) -> Self {
        Self { physical, mode: DroneMode::Flying }
    }

    pub fn riding(physical: S, car: CarId) -> Self {
        Self { physical, mode: DroneMode::Riding(car) }
    }

    pub fn mode(&self) -> &DroneMode {
        &self.mode
    }

    #[inline]
    pub fn on_car(&self) -> bool {
        matches!(self.mode, DroneMode::Riding(_))
    }

    #[inline]
    pub fn car_id(&self) -> Option<&CarId> {
        match &self.mode {
            DroneMode::Riding(car) => Some(car),
            DroneMode::Flying => None,
        }
    }
}

impl<S: DynamicsState> SdmcState<S> {
    pub fn position(&self) -> Point {
        self.physical.position()
    }

    pub fn speed(&self) -> f64 {
        self.physical.speed()
    }
}

/// One step's input: a continuous dynamics action or a mode transition.
#[derive(Clone, Debug, PartialEq)]
pub enum SdmcAction<A> {
    Dynamics(A),
    HopOn(CarId),
    Stay,
    HopOff,
}

impl<A> SdmcAction<A> {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            SdmcAction::Dynamics(_) => "dynamics",
            SdmcAction::HopOn(_) => "hop_on",
            SdmcAction::Stay => "stay",
            SdmcAction::HopOff => "hop_off",
        }
    }
}
