//! Degree-of-freedom selection.
//!
//! A constraint string such as `"Tx_Ty_Tz_Rx_Ry_Sz"` names which slots of the
//! 9-parameter model the optimizer may vary. Every other slot stays pinned at
//! its identity default for the whole run.


use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::registration::model::DofVector;
use crate::registration::result::RegistrationError;

/// Separator between DOF tokens in a constraint string.
pub const DOF_SEPARATOR: char = '_';

/// One slot of the 9-parameter model.
///
/// Declaration order is the slot order of [`DofVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
pub enum Dof {
    Tx,
    Ty,
    Tz,
    Rx,
    Ry,
    Rz,
    Sx,
    Sy,
    Sz,
}

/// Family a DOF belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DofKind {
    Translation,
    Rotation,
    Scale,
}

impl Dof {
    pub const COUNT: usize = 9;

    /// Index into [`DofVector`].
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> DofKind {
        match self {
            Dof::Tx | Dof::Ty | Dof::Tz => DofKind::Translation,
            Dof::Rx | Dof::Ry | Dof::Rz => DofKind::Rotation,
            Dof::Sx | Dof::Sy | Dof::Sz => DofKind::Scale,
        }
    }

    /// Value of this slot in the identity transform.
    #[inline]
    pub fn identity_value(self) -> f64 {
        match self.kind() {
            DofKind::Scale => 1.0,
            DofKind::Translation | DofKind::Rotation => 0.0,
        }
    }

    pub fn all() -> impl Iterator<Item = Dof> {
        Dof::iter()
    }
}

/// Ordered list of DOFs the optimizer controls.
///
/// Parameter `i` of the optimizer drives slot `dofs()[i]`. Duplicate names are
/// kept: each occurrence consumes its own optimizer dimension, and when the
/// parameters are written back into a [`DofVector`] the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofSelection {
    dofs: Vec<Dof>,
}

impl DofSelection {
    pub fn new(dofs: Vec<Dof>) -> Self {
        Self { dofs }
    }

    /// All nine slots in model order.
    pub fn full() -> Self {
        Self::new(Dof::all().collect())
    }

    /// Parse an underscore-joined constraint string.
    ///
    /// Tokens are case-sensitive. An empty token (empty string, leading,
    /// trailing or doubled separator) is rejected like any unknown name.
    pub fn parse(spec: &str) -> Result<Self, RegistrationError> {
        let dofs = spec
            .split(DOF_SEPARATOR)
            .map(|token| {
                Dof::from_str(token).map_err(|_| RegistrationError::InvalidDofName {
                    name: token.to_string(),
                    spec: spec.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let selection = Self::new(dofs);
        if selection.has_duplicates() {
            tracing::warn!(
                "DOF constraint '{}' names a slot more than once; the last occurrence drives it",
                spec
            );
        }
        Ok(selection)
    }

    #[inline]
    pub fn dofs(&self) -> &[Dof] {
        &self.dofs
    }

    /// Number of optimizer dimensions.
    #[inline]
    pub fn len(&self) -> usize {
        self.dofs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }

    pub fn contains(&self, dof: Dof) -> bool {
        self.dofs.contains(&dof)
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = [false; Dof::COUNT];
        self.dofs
            .iter()
            .any(|dof| std::mem::replace(&mut seen[dof.slot()], true))
    }

    /// Slot indices in named order.
    pub fn slots(&self) -> Vec<usize> {
        self.dofs.iter().map(|dof| dof.slot()).collect()
    }

    /// Optimizer starting point: the identity value of every named slot.
    pub fn initial_values(&self) -> Vec<f64> {
        self.dofs.iter().map(|dof| dof.identity_value()).collect()
    }

    /// Identity vector with `params[i]` written into slot `dofs()[i]`, in order.
    pub fn overlay(&self, params: &[f64]) -> DofVector {
        debug_assert_eq!(
            params.len(),
            self.dofs.len(),
            "overlay: expected one parameter per selected DOF"
        );
        let mut vector = DofVector::identity();
        for (&dof, &value) in self.dofs.iter().zip(params) {
            vector.set(dof, value);
        }
        vector
    }
}

impl FromStr for DofSelection {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DofSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, dof) in self.dofs.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", DOF_SEPARATOR)?;
            }
            write!(f, "{}", dof)?;
        }
        Ok(())
    }
}
