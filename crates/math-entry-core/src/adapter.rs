//! Math Editing Adapter.
//!
//! Owns the interaction's live field and funnels every change to it through
//! the `MathBackend`. Creation is idempotent: an existing editable field is
//! reconfigured in place, never duplicated.

use crate::error::MathEntryError;
use crate::gap;
use crate::platform::{FieldConfig, MathBackend, MathField};

/// The field currently living in the interaction's node.
#[derive(Debug, Clone)]
pub enum MathFieldState<F> {
    /// No field (never rendered, placeholder-only, or destroyed).
    Detached,
    /// One editable field.
    Single(F),
    /// A static field with independently editable inner fields.
    Composite { root: F, inner_fields: Vec<F> },
}

impl<F> Default for MathFieldState<F> {
    fn default() -> Self {
        MathFieldState::Detached
    }
}

impl<F> MathFieldState<F> {
    pub fn is_detached(&self) -> bool {
        matches!(self, MathFieldState::Detached)
    }
}

pub struct MathEditingAdapter<B: MathBackend> {
    backend: B,
    state: MathFieldState<B::Field>,
}

impl<B: MathBackend> MathEditingAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: MathFieldState::Detached,
        }
    }

    pub fn state(&self) -> &MathFieldState<B::Field> {
        &self.state
    }

    /// Ensure an editable field exists and carries `config`.
    ///
    /// A composite field is reverted first; the node can only host one field.
    pub fn create_or_reconfigure_editable(
        &mut self,
        config: &FieldConfig,
    ) -> Result<&B::Field, MathEntryError> {
        if let MathFieldState::Single(field) = &self.state {
            tracing::trace!("reconfiguring existing editable field");
            field.reconfigure(config);
        } else {
            self.revert();
            let field = self.backend.create_editable(config)?;
            tracing::debug!("created editable field");
            self.state = MathFieldState::Single(field);
        }

        self.single()
            .ok_or_else(|| MathEntryError::Backend("editable field missing after creation".into()))
    }

    /// Build a static field from authored LaTeX, one inner field per gap.
    ///
    /// Returns the number of inner fields.
    pub fn create_static(
        &mut self,
        authored_latex: &str,
        config: &FieldConfig,
    ) -> Result<usize, MathEntryError> {
        self.revert();

        let root = self.backend.create_static(&gap::to_runtime(authored_latex))?;
        let inner_fields = root.inner_fields();
        for field in &inner_fields {
            field.reconfigure(config);
        }

        let expected = gap::count_gaps(authored_latex);
        if inner_fields.len() != expected {
            tracing::warn!(
                expected,
                found = inner_fields.len(),
                "static field inner field count differs from gap count"
            );
        }

        let count = inner_fields.len();
        tracing::debug!(inner_fields = count, "created static field");
        self.state = MathFieldState::Composite { root, inner_fields };
        Ok(count)
    }

    /// The single editable field, if that is what the node holds.
    pub fn single(&self) -> Option<&B::Field> {
        match &self.state {
            MathFieldState::Single(field) => Some(field),
            _ => None,
        }
    }

    /// Inner fields of a composite field; empty for anything else.
    pub fn inner_fields(&self) -> &[B::Field] {
        match &self.state {
            MathFieldState::Composite { inner_fields, .. } => inner_fields,
            _ => &[],
        }
    }

    pub fn inner_field(&self, index: usize) -> Option<&B::Field> {
        self.inner_fields().get(index)
    }

    /// Replace the single field's content with authored LaTeX.
    ///
    /// Gap markers are shown through the embed widget. Returns false when
    /// there is no single field.
    pub fn set_single_latex(&self, authored_latex: &str) -> bool {
        match self.single() {
            Some(field) => {
                field.set_latex(&gap::to_authoring(authored_latex));
                true
            }
            None => false,
        }
    }

    /// Revert the node to bare markup. No-op when nothing is attached.
    pub fn revert(&mut self) {
        match std::mem::take(&mut self.state) {
            MathFieldState::Detached => {}
            MathFieldState::Single(field) => {
                tracing::debug!("reverting editable field");
                field.revert();
            }
            MathFieldState::Composite { root, .. } => {
                tracing::debug!("reverting static field");
                root.revert();
            }
        }
    }
}
