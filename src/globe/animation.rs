use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationSettings {
    /// Factor turning frame timestamps into shader time, 0.001 for milliseconds.
    pub time_scale: f32,
    /// Radians of rotation about +y per unit of shader time.
    pub rotation_rate: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            time_scale: 0.001,
            rotation_rate: 0.05,
        }
    }
}

/// Values written for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameUpdate {
    pub time: f32,
    pub rotation: f32,
}

/// Elapsed shader time of one globe. Never decreases.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    time: f32,
}

impl AnimationState {
    pub fn time(&self) -> f32 {
        self.time
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DriverPhase {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Receives the per-frame values and presents the frame.
pub trait FrameTarget {
    type Error;

    fn set_time(&mut self, time: f32);

    fn set_rotation(&mut self, angle: f32);

    fn redraw(&mut self) -> Result<(), Self::Error>;
}

/// Asks the host for one more tick.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct AnimationDriver {
    settings: AnimationSettings,
    state: AnimationState,
    phase: DriverPhase,
    stop: StopHandle,
}

impl AnimationDriver {
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            settings,
            state: AnimationState::default(),
            phase: DriverPhase::Idle,
            stop: StopHandle::default(),
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frame values for a timestamp. Pure: rotation depends on nothing but the timestamp.
    pub fn frame_at(&self, timestamp: f64) -> FrameUpdate {
        let time = (timestamp * self.settings.time_scale as f64) as f32;
        FrameUpdate {
            time,
            rotation: self.settings.rotation_rate * time,
        }
    }

    /// Moves from idle to running and requests the first frame. Called once the mesh is
    /// built; later calls do nothing.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.phase != DriverPhase::Idle {
            return;
        }
        if self.stop.is_stopped() {
            self.phase = DriverPhase::Stopped;
            return;
        }

        self.phase = DriverPhase::Running;
        scheduler.request_frame();
    }

    /// Handles one frame.
    ///
    /// Returns `Ok(None)` when the driver is not running. The next frame is requested
    /// before any redraw error is handed back to the caller.
    pub fn tick<T: FrameTarget>(
        &mut self,
        timestamp: f64,
        target: &mut T,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<Option<FrameUpdate>, T::Error> {
        if self.phase == DriverPhase::Running && self.stop.is_stopped() {
            log::info!("Animation stopped at t = {}", self.state.time);
            self.phase = DriverPhase::Stopped;
        }
        if self.phase != DriverPhase::Running {
            return Ok(None);
        }

        let mut update = self.frame_at(timestamp);
        if update.time < self.state.time {
            log::debug!(
                "Ignoring stale frame timestamp {timestamp} (t = {} < {})",
                update.time,
                self.state.time
            );
            update = FrameUpdate {
                time: self.state.time,
                rotation: self.settings.rotation_rate * self.state.time,
            };
        }
        self.state.time = update.time;

        target.set_time(update.time);
        target.set_rotation(update.rotation);
        let redrawn = target.redraw();

        scheduler.request_frame();

        redrawn.map(|_| Some(update))
    }
}
