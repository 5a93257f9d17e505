//! Static crisis helpline list served alongside the responder.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Helpline {
    pub name: &'static str,
    pub number: &'static str,
    pub available: &'static str,
}

pub const HELPLINES: &[Helpline] = &[
    Helpline {
        name: "National Suicide Prevention Lifeline",
        number: "988",
        available: "24/7",
    },
    Helpline {
        name: "Crisis Text Line",
        number: "Text HOME to 741741",
        available: "24/7",
    },
    Helpline {
        name: "SAMHSA National Helpline",
        number: "1-800-662-4357",
        available: "24/7",
    },
    Helpline {
        name: "Vandrevala Foundation (India)",
        number: "1860-2662-345",
        available: "24/7",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct Resources {
    pub helplines: &'static [Helpline],
}

pub fn resources() -> Resources {
    Resources {
        helplines: HELPLINES,
    }
}
