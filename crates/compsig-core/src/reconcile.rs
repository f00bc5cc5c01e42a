//! Digest reconciliation for component references and resources.
//!
//! Reconciliation walks a descriptor, asks caller supplied resolvers for the
//! digest of every digestable element, and either fills in missing digests or
//! checks stored ones against the resolver. Elements carrying the exclusion
//! marker and resources without access are left untouched.

use compsig_schemas::{ComponentDescriptor, ComponentReference, DigestSpec, ElementId, Resource};
use tracing::{debug, info};

use crate::context::ResolveContext;
use crate::errors::{ReconcileError, ResolveError};

/// Counters describing what a reconciliation run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Digests written into the descriptor.
    pub filled: usize,
    /// Stored digests the resolver confirmed.
    pub verified: usize,
    /// Elements marked as excluded from signing.
    pub excluded: usize,
    /// Resources skipped because they have no access.
    pub skipped: usize,
}

enum Stored {
    Excluded,
    Missing,
    Present(DigestSpec),
}

impl Stored {
    fn of(digest: Option<&DigestSpec>) -> Self {
        match digest {
            Some(d) if d.is_excluded() => Stored::Excluded,
            Some(d) => Stored::Present(d.clone()),
            None => Stored::Missing,
        }
    }
}

/// Fills missing digests and checks present ones.
///
/// References are processed before resources, each in descriptor order.
/// Resolvers receive the descriptor as it stood before the current element
/// was updated; the first error stops the run and digests already filled stay
/// in place. Running twice with deterministic resolvers is a no-op the second
/// time.
///
/// # Errors
///
/// - [`ReconcileError::Cancelled`] if `ctx` is cancelled before a resolver
///   call, or a resolver fails after cancellation
/// - [`ReconcileError::Resolver`] if a resolver fails
/// - [`ReconcileError::DigestMismatch`] if a stored digest differs from the
///   resolved one
pub fn add_digests_to_descriptor<R, S>(
    ctx: &ResolveContext,
    descriptor: &mut ComponentDescriptor,
    mut reference_resolver: R,
    mut resource_resolver: S,
) -> Result<ReconcileReport, ReconcileError>
where
    R: FnMut(
        &ResolveContext,
        &ComponentDescriptor,
        &ComponentReference,
    ) -> Result<DigestSpec, ResolveError>,
    S: FnMut(&ResolveContext, &ComponentDescriptor, &Resource) -> Result<DigestSpec, ResolveError>,
{
    let mut report = ReconcileReport::default();

    for idx in 0..descriptor.component.component_references.len() {
        let reference = &descriptor.component.component_references[idx];
        let element = reference.element_id();
        let path = format!("component.componentReferences[{idx}]");
        let stored = Stored::of(reference.digest.as_ref());
        if let Stored::Excluded = stored {
            debug!(%element, "digest excluded from signature");
            report.excluded += 1;
            continue;
        }

        check_cancelled(ctx)?;
        let resolved = reference_resolver(ctx, descriptor, reference)
            .map_err(|source| resolver_error(ctx, &element, &path, source))?;
        if let Some(digest) = apply(&mut report, element, path, stored, resolved)? {
            descriptor.component.component_references[idx].digest = Some(digest);
        }
    }

    for idx in 0..descriptor.component.resources.len() {
        let resource = &descriptor.component.resources[idx];
        let element = resource.element_id();
        let path = format!("component.resources[{idx}]");
        let stored = Stored::of(resource.digest.as_ref());
        if let Stored::Excluded = stored {
            debug!(%element, "digest excluded from signature");
            report.excluded += 1;
            continue;
        }
        if !resource.has_access() {
            debug!(%element, "resource has no access, skipping");
            report.skipped += 1;
            continue;
        }

        check_cancelled(ctx)?;
        let resolved = resource_resolver(ctx, descriptor, resource)
            .map_err(|source| resolver_error(ctx, &element, &path, source))?;
        if let Some(digest) = apply(&mut report, element, path, stored, resolved)? {
            descriptor.component.resources[idx].digest = Some(digest);
        }
    }

    info!(
        component = %descriptor.component.name,
        filled = report.filled,
        verified = report.verified,
        excluded = report.excluded,
        skipped = report.skipped,
        "reconciled digests"
    );
    Ok(report)
}

/// Returns the digest to store, if any.
fn apply(
    report: &mut ReconcileReport,
    element: ElementId,
    path: String,
    stored: Stored,
    resolved: DigestSpec,
) -> Result<Option<DigestSpec>, ReconcileError> {
    match stored {
        Stored::Present(expected) => {
            if expected != resolved {
                return Err(ReconcileError::DigestMismatch {
                    element,
                    path,
                    expected,
                    actual: resolved,
                });
            }
            debug!(%element, "digest confirmed");
            report.verified += 1;
            Ok(None)
        }
        Stored::Missing => {
            debug!(%element, value = %resolved.value, "digest filled");
            report.filled += 1;
            Ok(Some(resolved))
        }
        Stored::Excluded => Ok(None),
    }
}

fn check_cancelled(ctx: &ResolveContext) -> Result<(), ReconcileError> {
    if ctx.is_cancelled() {
        return Err(ReconcileError::Cancelled);
    }
    Ok(())
}

fn resolver_error(
    ctx: &ResolveContext,
    element: &ElementId,
    path: &str,
    source: ResolveError,
) -> ReconcileError {
    if ctx.is_cancelled() {
        ReconcileError::Cancelled
    } else {
        ReconcileError::Resolver {
            element: element.clone(),
            path: path.to_string(),
            source,
        }
    }
}
