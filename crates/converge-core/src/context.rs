//! Per-invocation context threaded through every reconciliation step

use converge_fs::AttributeSet;

use crate::attributes::AttributeApplier;
use crate::gate::DryRunGate;
use crate::outcome::Outcome;
use crate::params::Request;

/// The request being reconciled, the services it uses and the outcome sink.
pub(crate) struct Invocation<'a> {
    pub(crate) request: &'a Request,
    pub(crate) gate: DryRunGate,
    pub(crate) applier: AttributeApplier<'a>,
    pub(crate) outcome: Outcome,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(request: &'a Request, gate: DryRunGate, applier: AttributeApplier<'a>) -> Self {
        Self {
            request,
            gate,
            applier,
            outcome: Outcome::new(&request.path),
        }
    }

    /// Converge the requested attributes on `path` and record the result.
    pub(crate) fn converge_attributes(&mut self, path: &std::path::Path) -> crate::gate::Step<()> {
        let changed = self.applier.apply(path, &self.request.attributes)?;
        self.outcome.record(changed);
        Ok(())
    }

    /// Converge everything but the mode on a symlink met during recursion.
    ///
    /// chmod acts on the link target, which may lie outside the tree.
    pub(crate) fn converge_link_attributes(&mut self, path: &std::path::Path) -> crate::gate::Step<()> {
        let attrs = AttributeSet {
            mode: None,
            ..self.request.attributes.clone()
        };
        let changed = self.applier.apply(path, &attrs)?;
        self.outcome.record(changed);
        Ok(())
    }

    pub(crate) fn finish(self) -> Outcome {
        self.outcome
    }
}
