//! Shader models (`ps_6_0`, `cs_6_1`, ...).

use std::fmt;

use crate::model::constants::ShaderKind;

/// A pipeline stage together with its model version.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ShaderModel {
    /// Pipeline stage
    pub kind: ShaderKind,
    /// Model major version
    pub major: u32,
    /// Model minor version
    pub minor: u32,
}

/// `(major, minor)` pairs known for pixel, vertex, geometry and compute stages.
const FULL_MODELS: [(u32, u32); 6] = [(4, 0), (4, 1), (5, 0), (5, 1), (6, 0), (6, 1)];
/// `(major, minor)` pairs known for the tessellation stages, which start at 5.0.
const TESSELLATION_MODELS: [(u32, u32); 4] = [(5, 0), (5, 1), (6, 0), (6, 1)];

impl ShaderModel {
    /// Creates a shader model. No validation is performed.
    #[must_use]
    pub const fn new(kind: ShaderKind, major: u32, minor: u32) -> Self {
        ShaderModel { kind, major, minor }
    }

    /// Canonical name, e.g. `vs_6_0`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}_{}_{}", self.kind.prefix(), self.major, self.minor)
    }

    /// Looks up a known shader model by its canonical name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dxilmd::model::{ShaderKind, ShaderModel};
    ///
    /// let model = ShaderModel::by_name("hs_6_1").unwrap();
    /// assert_eq!(model, ShaderModel::new(ShaderKind::Hull, 6, 1));
    /// assert!(ShaderModel::by_name("hs_4_0").is_none());
    /// assert!(ShaderModel::by_name("vs_6").is_none());
    /// ```
    #[must_use]
    pub fn by_name(name: &str) -> Option<ShaderModel> {
        let mut parts = name.split('_');
        let kind = ShaderKind::from_prefix(parts.next()?)?;
        let major = parse_version_part(parts.next()?)?;
        let minor = parse_version_part(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }

        let known: &[(u32, u32)] = match kind {
            ShaderKind::Hull | ShaderKind::Domain => &TESSELLATION_MODELS,
            _ => &FULL_MODELS,
        };
        known
            .contains(&(major, minor))
            .then_some(ShaderModel::new(kind, major, minor))
    }

    /// Returns `true` if this model can be expressed in DXIL (6.0 and 6.1 of a real stage).
    #[must_use]
    pub fn is_valid_for_dxil(&self) -> bool {
        self.kind != ShaderKind::Invalid && self.major == 6 && self.minor <= 1
    }
}

fn parse_version_part(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
