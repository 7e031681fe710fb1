#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn path(self) -> &'static str {
        match self {
            Hand::Left => "/user/hand/left",
            Hand::Right => "/user/hand/right",
        }
    }

    pub fn from_path(path: &str) -> Option<Hand> {
        match path {
            "/user/hand/left" => Some(Hand::Left),
            "/user/hand/right" => Some(Hand::Right),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackingOrigin {
    Seated,
    #[default]
    Standing,
    RawAndUncalibrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingResult {
    #[default]
    Uninitialized,
    RunningOk,
    RunningOutOfRange,
}

/// Row-major 3x4 device-to-tracking transform.
pub type HmdMatrix34 = [[f32; 4]; 3];

/// Pose record handed back to the legacy application.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackedDevicePose {
    pub device_to_absolute_tracking: HmdMatrix34,
    /// World space.
    pub velocity: [f32; 3],
    /// World space.
    pub angular_velocity: [f32; 3],
    pub tracking_result: TrackingResult,
    pub pose_is_valid: bool,
    pub device_is_connected: bool,
}

/// Properties a family may override when the legacy application asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedProperty {
    ManufacturerName,
    ModelNumber,
    ControllerType,
    RenderModelName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PathHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionHandle(pub u64);

impl ActionHandle {
    pub const NULL: ActionHandle = ActionHandle(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpaceHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: [f32; 3],
    /// x, y, z, w
    pub orientation: [f32; 4],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseVelocity {
    pub linear: [f32; 3],
    pub angular: [f32; 3],
}

/// Result of locating a space: pose, velocity and validity flags.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpaceLocation {
    pub pose: Pose,
    pub velocity: PoseVelocity,
    pub position_valid: bool,
    pub orientation_valid: bool,
}
