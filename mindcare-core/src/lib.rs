//! mindcare-core: topic table, keyword classifier and template selector for
//! the MindCare responder

pub mod classifier;
pub mod event;
pub mod resources;
pub mod responses;
pub mod selector;
pub mod topic;
pub mod window;

pub use classifier::{classifier, classify, Classification, Classifier, MatchSource, Rule};
pub use event::{ResponseEvent, ResponsePath};
pub use resources::{resources, Helpline, Resources, HELPLINES};
pub use responses::validate_tables;
pub use selector::{select, select_random, Selection};
pub use topic::Topic;
pub use window::{ConversationWindow, DEFAULT_WINDOW};

use rand::Rng;

/// The canned path end to end: classify, pick a template, record the event.
pub fn fallback_response<S: AsRef<str>, R: Rng>(
    classifier: &Classifier,
    message: &str,
    history: &[S],
    rng: &mut R,
) -> ResponseEvent {
    let c = classifier.classify_detailed(message, history);
    let selection = select(c.topic, rng);
    ResponseEvent::from_selection(message, c.source, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fallback_response_for_crisis() {
        let mut rng = StdRng::seed_from_u64(1);
        let history: [&str; 0] = [];
        let ev = fallback_response(classifier(), "I want to end it all", &history, &mut rng);
        assert_eq!(ev.topic, Some(Topic::Crisis));
        assert_eq!(ev.path, ResponsePath::Fallback);
        assert!(Topic::Crisis.templates().contains(&ev.response.as_str()));
    }
}
