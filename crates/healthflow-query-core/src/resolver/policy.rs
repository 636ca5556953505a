//! Resolution policy: how much to trust a candidate.
//!
//! | Candidate          | Mode         | Executes |
//! |--------------------|--------------|----------|
//! | Exact              | `auto`       | yes      |
//! | Fuzzy              | `confirm`    | after yes|
//! | Learned correction | `confirm`    | after yes|
//! | Conceptual         | `contextual` | yes      |
//! | None               | `reject`     | no       |

use crate::models::{ExecutionMode, Filters, MatchCandidate, Resolution};

/// Turn the pipeline's candidate into the caller-facing decision.
///
/// `reject_message` is only evaluated when nothing matched.
pub fn decide(
    candidate: MatchCandidate,
    filters: Filters,
    reject_message: impl FnOnce() -> String,
) -> Resolution {
    let confidence = candidate.confidence();
    let handler_id = candidate.handler().map(str::to_string);

    let (mode, message, context) = match &candidate {
        MatchCandidate::Exact { .. } => (ExecutionMode::Auto, None, None),
        MatchCandidate::Fuzzy {
            handler,
            suggestion,
            ..
        }
        | MatchCandidate::LearnedCorrection {
            handler,
            suggestion,
            ..
        } => {
            let message = suggestion
                .clone()
                .unwrap_or_else(|| format!("Did you mean \"{}\"?", handler));
            (ExecutionMode::Confirm, Some(message), None)
        }
        MatchCandidate::Conceptual {
            handler, context, ..
        } => {
            let message = context
                .implications
                .first()
                .map(|implication| format!("We know: {}. Suggesting: {}", implication, handler));
            (ExecutionMode::Contextual, message, Some(context.clone()))
        }
        MatchCandidate::None => (ExecutionMode::Reject, Some(reject_message()), None),
    };

    Resolution {
        mode,
        candidate,
        handler_id,
        filters,
        confidence,
        message,
        context,
    }
}
