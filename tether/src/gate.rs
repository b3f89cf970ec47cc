//! Decides whether an interaction should run a validation pass.
//!
//! Once a field carries an error every interaction revalidates it, so the
//! error clears as soon as the input is fixed. Without an error, validation is
//! throttled by the configured mode: `onSubmit` never validates before the
//! first submit, `onBlur` skips change events, and after submission the
//! revalidate mode decides which interaction kind is skipped.

use crate::mode::{ModeFlags, ReValidateFlags};

/// The kind of interaction being gated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interaction {
    #[default]
    Change,
    Blur,
}

/// Everything the gate looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateContext {
    pub has_existing_error: bool,
    pub is_on_blur_mode: bool,
    pub is_on_submit_mode: bool,
    pub is_on_change_mode: bool,
    pub is_revalidate_on_blur: bool,
    pub is_revalidate_on_submit: bool,
    pub is_submitted: bool,
    pub interaction: Interaction,
}

impl GateContext {
    /// Build a context from mode flags for the given interaction.
    pub fn new(mode: ModeFlags, revalidate: ReValidateFlags, interaction: Interaction) -> Self {
        Self {
            has_existing_error: false,
            is_on_blur_mode: mode.is_on_blur,
            is_on_submit_mode: mode.is_on_submit,
            is_on_change_mode: mode.is_on_change,
            is_revalidate_on_blur: revalidate.is_revalidate_on_blur,
            is_revalidate_on_submit: revalidate.is_revalidate_on_submit,
            is_submitted: false,
            interaction,
        }
    }

    /// Set whether the field currently has an error.
    pub fn error(mut self, has_existing_error: bool) -> Self {
        self.has_existing_error = has_existing_error;
        self
    }

    /// Set whether the form has been submitted.
    pub fn submitted(mut self, is_submitted: bool) -> Self {
        self.is_submitted = is_submitted;
        self
    }
}

/// Whether a validation pass should run for this interaction.
pub fn should_validate(ctx: &GateContext) -> bool {
    if ctx.has_existing_error {
        return true;
    }

    let is_change = ctx.interaction == Interaction::Change;

    if ctx.is_submitted {
        let skip_blur = ctx.is_revalidate_on_submit && !is_change;
        let skip_change = ctx.is_revalidate_on_blur && is_change;
        !(skip_blur || skip_change)
    } else {
        let skip_change = ctx.is_on_blur_mode && is_change;
        !(ctx.is_on_submit_mode || skip_change)
    }
}
