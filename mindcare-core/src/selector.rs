//! Uniform random choice of a response template.

use rand::Rng;

use crate::topic::Topic;

/// A chosen template and its position in the topic's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub topic: Topic,
    pub index: usize,
    pub text: &'static str,
}

/// Pick one template for `topic`. Calls are independent; repeats are allowed.
pub fn select<R: Rng>(topic: Topic, rng: &mut R) -> Selection {
    let templates = topic.templates();
    let index = rng.gen_range(0..templates.len());
    Selection {
        topic,
        index,
        text: templates[index],
    }
}

/// Same as [`select`] with the thread-local RNG.
pub fn select_random(topic: Topic) -> Selection {
    select(topic, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_selection_is_member_of_topic() {
        let mut rng = StdRng::seed_from_u64(7);
        for t in Topic::ALL {
            for _ in 0..100 {
                let s = select(t, &mut rng);
                assert_eq!(s.topic, t);
                assert_eq!(t.templates()[s.index], s.text);
            }
        }
    }

    #[test]
    fn test_every_template_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        for t in Topic::ALL {
            let mut seen = HashSet::new();
            for _ in 0..1000 {
                seen.insert(select(t, &mut rng).index);
            }
            assert_eq!(seen.len(), t.templates().len(), "dead template in {t}");
        }
    }

    #[test]
    fn test_thread_rng_variant() {
        let s = select_random(Topic::Crisis);
        assert!(Topic::Crisis.templates().contains(&s.text));
    }
}
