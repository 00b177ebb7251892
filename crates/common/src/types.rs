use glam::DVec3;
use serde::{Deserialize, Serialize};

/// World-space position or direction. Value semantics, f64 components.
pub type Vector3 = DVec3;

/// Convert view angles to a unit direction vector.
///
/// Pitch rotates toward +z, yaw rotates in the xy plane starting at +x.
pub fn angles_to_vector(view: ViewAngles) -> Vector3 {
    let (sin_pitch, cos_pitch) = view.pitch.sin_cos();
    let (sin_yaw, cos_yaw) = view.yaw.sin_cos();
    Vector3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch)
}

/// Two-angle orientation: pitch (vertical) and yaw (horizontal), in radians.
///
/// Pitch is kept within a symmetric limit by the player; yaw is unbounded and
/// wraps naturally through the trig functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewAngles {
    pub pitch: f64,
    pub yaw: f64,
}

impl ViewAngles {
    pub fn new(pitch: f64, yaw: f64) -> Self {
        Self { pitch, yaw }
    }

    /// Return these angles shifted by the given deltas.
    pub fn offset(self, dpitch: f64, dyaw: f64) -> Self {
        Self {
            pitch: self.pitch + dpitch,
            yaw: self.yaw + dyaw,
        }
    }

    /// True if both angles differ from `other` by no more than `eps`.
    pub fn approx_eq(&self, other: &ViewAngles, eps: f64) -> bool {
        (self.pitch - other.pitch).abs() <= eps && (self.yaw - other.yaw).abs() <= eps
    }

    /// Clamp pitch into `[-limit, limit]`. Yaw is left untouched.
    pub fn clamp_pitch(self, limit: f64) -> Self {
        Self {
            pitch: self.pitch.clamp(-limit, limit),
            yaw: self.yaw,
        }
    }

    /// Unit direction vector for these angles.
    pub fn direction(self) -> Vector3 {
        angles_to_vector(self)
    }
}

/// Identity of a single world cell or rendered pixel: one printable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub char);

impl BlockId {
    pub const EMPTY: BlockId = BlockId(' ');
    pub const GROUND: BlockId = BlockId('@');
    pub const HIGHLIGHT: BlockId = BlockId('o');
    pub const EDGE: BlockId = BlockId('-');

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
