//! The digital-design curriculum and its previous/next navigation.
//!
//! Topics are addressed by slug, derived from the title. Lookups never
//! mutate anything.

use serde::Serialize;

/// Route prefix of every topic page.
pub const BASE_PATH: &str = "/interview-prep/digital-design";

/// A group of related subtopics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hub {
    pub title: &'static str,
    pub subtopics: &'static [&'static str],
}

pub const DIGITAL_DESIGN: &[Hub] = &[
    Hub {
        title: "Digital Logic Fundamentals",
        subtopics: &[
            "What is a Digital vs. Analog Signal?",
            "Number Systems Explained: Binary, Octal, and Hexadecimal",
            "How to Convert Between Binary, Decimal, and Hexadecimal",
            "Signed Number Representation: 1's Complement and 2's Complement",
            "Binary Coded Decimal (BCD) Explained",
            "Boolean Algebra: Key Postulates and Theorems",
            "Digital Logic Gates: AND, OR, NOT, XOR, XNOR",
            "What are Universal Gates? (NAND and NOR)",
            "De Morgan's Theorem: How to Use it for Logic Simplification",
            "Canonical Forms: Sum-of-Products (SOP) and Product-of-Sums (POS)",
            "What is a Karnaugh Map (K-Map)? A Step-by-Step Guide",
            "Logic Minimization using K-Maps (with Don't Care Conditions)",
            "Advanced: Quine-McCluskey (Tabular Method) for Minimization",
        ],
    },
    Hub {
        title: "Combinational Logic Circuits",
        subtopics: &[
            "What is a Combinational Circuit? (vs. Sequential)",
            "How to Design a Multiplexer (Mux)",
            "How to Implement any Boolean Function using a Mux",
            "How to Build a 4:1 Mux from 2:1 Muxes (Common Interview Question)",
            "What is a Decoder? (and How it Differs from a Demultiplexer)",
            "What is an Encoder? (Priority Encoder vs. Binary Encoder)",
            "Half-Adder and Full-Adder Explained (with Truth Table & Logic)",
            "What is a Ripple-Carry Adder? (Advantages & Disadvantages)",
            "The Carry-Lookahead Adder (CLA): A Fast Adder Explained",
            "How to Build a Full Subtractor using a Full Adder",
            "Designing a 4-bit Magnitude Comparator",
            "What is an Array Multiplier?",
        ],
    },
    Hub {
        title: "Sequential Logic Design",
        subtopics: &[
            "Latch vs. Flip-Flop: The Ultimate Interview Guide",
            "The SR Latch: (NAND vs. NOR implementation)",
            "The D Latch (Gated Latch) and its Transparent Problem",
            "What is an Edge-Triggered D Flip-Flop? (Master-Slave Explained)",
            "D vs. T vs. JK Flip-Flops (with Characteristic Equations)",
            "The JK Flip-Flop Race-Around Condition",
            "Flip-Flop Timing: Asynchronous Preset and Clear Inputs",
            "What is a Shift Register? (SISO, SIPO, PISO, PIPO)",
            "How to Design a Universal Shift Register",
            "Synchronous vs. Asynchronous (Ripple) Counters",
            "How to Design a Synchronous Counter with Parallel Load",
            "Special Counters: Ring Counter and Johnson Counter",
            "What is Reset Synchronization? (Synchronous vs. Asynchronous Reset)",
        ],
    },
    Hub {
        title: "Finite State Machine (FSM) Design",
        subtopics: &[
            "Mealy vs. Moore: The Complete FSM Comparison",
            "How to Design an FSM (from State Diagram to Logic Gates)",
            "State Assignment: Binary vs. Gray vs. One-Hot Encoding",
            "State Minimization: The Partitioning Method Explained",
            "How to Analyze a Sequential Circuit (Derive FSM from Gates)",
            "FSM Design Problem: How to Design a Sequence Detector (e.g., '1011')",
            "FSM Design Problem: Designing a Serial Adder (Mealy and Moore)",
            "FSM Design Problem: Designing a Vending Machine Controller",
            "FSM Design Problem: Designing a Traffic Light Controller",
            "What is an Algorithmic State Machine (ASM) Chart?",
        ],
    },
    Hub {
        title: "Verilog & RTL Design for Interviews",
        subtopics: &[
            "Blocking (=) vs. Non-Blocking (<=) Assignments: The #1 Verilog Question",
            "Structural vs. Behavioral vs. Dataflow Modeling in Verilog",
            "How to Code a Combinational Circuit (always @*)",
            "How to Code a Sequential Circuit (always @(posedge clk))",
            "How to Create an Inadvertent Latch in Verilog (and How to Fix It)",
            "Verilog if-else vs. case Statements (Synthesis & Priority)",
            "Verilog Tasks vs. Functions: Key Differences",
            "What is a Parameterized Verilog Module?",
            "Bus Implementation: Tri-State Buffers vs. Multiplexers",
            "Verilog for Loops and the generate Construct",
            "FSM Verilog Coding Styles (1-Process, 2-Process, 3-Process)",
        ],
    },
    Hub {
        title: "Advanced Topics: STA, Timing & VLSI",
        subtopics: &[
            "Setup and Hold Time: The Most Important Timing Concepts",
            "How to Fix Setup and Hold Violations (Interview Guide)",
            "What is Metastability? (And How to Prevent It with Synchronizers)",
            "What is Clock Skew? (Positive vs. Negative Skew and its effect on Setup/Hold)",
            "What is Clock Jitter?",
            "Logic Hazards Explained: Static, Dynamic, and Function Hazards",
            "How to Find and Fix Static Hazards using K-Maps",
            "Static vs. Dynamic Power Consumption (Equation & Reduction Techniques)",
            "What is Clock Domain Crossing (CDC)?",
            "The VLSI Design Flow Explained (RTL to GDSII)",
            "What is Static Timing Analysis (STA)?",
            "What is Design for Testability (DFT)?",
            "Testing Fault Models: Stuck-at-0 and Stuck-at-1",
            "DFT Techniques: Scan Chains, Boundary Scan, and BIST",
        ],
    },
];

/// One page in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub title: String,
    pub slug: String,
}

impl Topic {
    pub fn href(&self) -> String {
        format!("{BASE_PATH}/{}", self.slug)
    }
}

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

impl From<&Topic> for NavLink {
    fn from(topic: &Topic) -> Self {
        Self {
            title: topic.title.clone(),
            href: topic.href(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// URL slug of a title: lowercase, apostrophes dropped, every other run of
/// non-alphanumerics collapsed to `-`, no leading or trailing dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().filter(|c| *c != '\'') {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Every subtopic of `hubs`, in reading order.
pub fn flatten(hubs: &[Hub]) -> Vec<Topic> {
    hubs.iter()
        .flat_map(|hub| hub.subtopics.iter())
        .map(|title| Topic {
            title: title.to_string(),
            slug: slugify(title),
        })
        .collect()
}

/// Previous and next topics around `slug`, or `None` if no topic has it.
pub fn neighbors(topics: &[Topic], slug: &str) -> Option<Neighbors> {
    let index = topics.iter().position(|t| t.slug == slug)?;
    Some(Neighbors {
        prev: index
            .checked_sub(1)
            .and_then(|i| topics.get(i))
            .map(NavLink::from),
        next: topics.get(index + 1).map(NavLink::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_matches_published_routes() {
        assert_eq!(
            slugify("Signed Number Representation: 1's Complement and 2's Complement"),
            "signed-number-representation-1s-complement-and-2s-complement"
        );
        assert_eq!(
            slugify("FSM Design Problem: How to Design a Sequence Detector (e.g., '1011')"),
            "fsm-design-problem-how-to-design-a-sequence-detector-e-g-1011"
        );
        assert_eq!(
            slugify("Blocking (=) vs. Non-Blocking (<=) Assignments: The #1 Verilog Question"),
            "blocking-vs-non-blocking-assignments-the-1-verilog-question"
        );
        assert_eq!(slugify("  --Hello--  "), "hello");
    }

    #[test]
    fn flatten_keeps_reading_order() {
        let topics = flatten(DIGITAL_DESIGN);
        let total: usize = DIGITAL_DESIGN.iter().map(|h| h.subtopics.len()).sum();

        assert_eq!(topics.len(), total);
        assert_eq!(topics[0].slug, "what-is-a-digital-vs-analog-signal");
    }

    #[test]
    fn neighbors_cross_hub_boundaries() {
        let topics = flatten(DIGITAL_DESIGN);

        let nav = neighbors(&topics, "latch-vs-flip-flop-the-ultimate-interview-guide").unwrap();

        assert_eq!(
            nav.prev.unwrap().title,
            "What is an Array Multiplier?"
        );
        assert_eq!(
            nav.next.unwrap().href,
            "/interview-prep/digital-design/the-sr-latch-nand-vs-nor-implementation"
        );
    }

    #[test]
    fn ends_have_one_neighbor() {
        let topics = flatten(DIGITAL_DESIGN);
        let first = &topics[0].slug;
        let last = &topics[topics.len() - 1].slug;

        assert!(neighbors(&topics, first).unwrap().prev.is_none());
        assert!(neighbors(&topics, last).unwrap().next.is_none());
    }

    #[test]
    fn unknown_slug_has_no_neighbors() {
        let topics = flatten(DIGITAL_DESIGN);

        assert_eq!(neighbors(&topics, "no-such-topic"), None);
    }

    #[test]
    fn slugs_are_unique() {
        let topics = flatten(DIGITAL_DESIGN);
        let mut slugs: Vec<_> = topics.iter().map(|t| t.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();

        assert_eq!(slugs.len(), topics.len());
    }
}
