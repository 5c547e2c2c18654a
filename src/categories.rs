use crate::config::CategoryMapping;

/// Logging capability handed to the pipeline. The import run reports
/// observable but non-fatal conditions through this rather than a global
/// logger so resolution behavior stays testable.
pub trait ImportLogger {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Production logger, forwards to `tracing`.
pub struct TracingLogger;

impl ImportLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Resolves category labels to taxonomy ids, in document order.
///
/// Labels with no mapping entry are skipped with a warning each; when labels
/// exist but no mapping is configured at all, a single info note is emitted
/// and the result is empty. Duplicated labels yield duplicated ids.
pub fn resolve(
    labels: &[String],
    mapping: Option<&CategoryMapping>,
    logger: &dyn ImportLogger,
) -> Vec<i64> {
    if labels.is_empty() {
        return Vec::new();
    }
    let Some(mapping) = mapping else {
        logger.info("categories found during import but no category mapping is configured");
        return Vec::new();
    };

    let mut ids = Vec::new();
    for label in labels {
        match mapping.id_for(label) {
            Some(id) => ids.push(id),
            None => logger.warning(&format!("no category mapping for \"{label}\"")),
        }
    }
    ids
}
