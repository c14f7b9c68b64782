//! Per-domain content used by prompt construction and fallback question synthesis.
//!
//! Lookups match bundle keywords as case-insensitive substrings of the subject
//! name. Order matters: the first matching bundle wins, so more specific
//! domains sit ahead of broader ones.

#[derive(Debug)]
pub struct OptionSet {
    pub keywords: &'static [&'static str],
    pub options: [&'static str; 4],
}

#[derive(Debug)]
pub struct SubjectBundle {
    pub key: &'static str,
    pub keywords: &'static [&'static str],
    pub prompt_rules: &'static [&'static str],
    /// Multiple choice stems; `{topic}` is substituted.
    pub mcq_templates: &'static [&'static str],
    /// Stems for every written-answer type.
    pub written_templates: &'static [&'static str],
    pub option_bank: &'static [OptionSet],
}

pub static MATH: SubjectBundle = SubjectBundle {
    key: "math",
    keywords: &["math", "algebra", "geometry", "calculus", "trigonometry", "statistic"],
    prompt_rules: &[
        "Every question must contain concrete numbers, expressions or figures to work with.",
        "Use plain-text notation for formulas (x^2, sqrt(x), a/b); do not use LaTeX.",
        "Numerical answers must be exact and verifiable from the given data.",
    ],
    mcq_templates: &[
        "Which value of x satisfies the equation formed in {topic} when 3x + 7 = 22?",
        "What is the value of the expression obtained in {topic} for 2(4 + 5) - 6?",
        "Which property is used when simplifying results in {topic}?",
        "A result in {topic} gives a ratio of 12 to 18. What is it in simplest form?",
    ],
    written_templates: &[
        "Solve the following problem from {topic}, showing each step: find x if 5x - 3 = 2x + 9.",
        "Prove the key result of {topic} and state every assumption used.",
        "Explain with a worked example how {topic} is applied to a real measurement problem.",
        "Derive the general formula used in {topic} and verify it with numerical values.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["equation", "satisf"],
            options: ["x = 3", "x = 4", "x = 6", "x = 5"],
        },
        OptionSet {
            keywords: &["expression", "value of"],
            options: ["10", "18", "15", "12"],
        },
        OptionSet {
            keywords: &["ratio", "simplest"],
            options: ["3:2", "6:9", "4:6", "2:3"],
        },
        OptionSet {
            keywords: &["property"],
            options: [
                "Closure property",
                "Identity property",
                "Associative property",
                "Distributive property",
            ],
        },
    ],
};

pub static PHYSICS: SubjectBundle = SubjectBundle {
    key: "physics",
    keywords: &["physics", "mechanics", "electro", "optics", "thermo"],
    prompt_rules: &[
        "Numerical questions must give all quantities with SI units.",
        "Prefer situations from laboratory work or everyday phenomena.",
        "Conceptual questions must test a law or principle, not a definition alone.",
    ],
    mcq_templates: &[
        "Which equation correctly relates the quantities studied in {topic}?",
        "What is the SI unit of the principal quantity measured in {topic}?",
        "Which law best explains the behaviour observed in {topic}?",
        "Which change increases the effect described in {topic}?",
    ],
    written_templates: &[
        "State the governing law of {topic} and explain one experiment that verifies it.",
        "A body of mass 2 kg is studied under {topic}. Calculate the required quantity, showing units.",
        "Explain the difference between ideal and real behaviour in {topic}.",
        "Describe how {topic} is applied in a practical device.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["equation", "relates"],
            options: ["F = m/a", "P = F x A", "v = u - at", "F = ma"],
        },
        OptionSet {
            keywords: &["unit"],
            options: ["Watt", "Pascal", "Newton", "Joule"],
        },
        OptionSet {
            keywords: &["law"],
            options: [
                "Hooke's law",
                "Ohm's law",
                "Newton's first law",
                "Law of conservation of energy",
            ],
        },
        OptionSet {
            keywords: &["increase", "change"],
            options: [
                "Reducing the applied force",
                "Lowering the temperature",
                "Removing the medium",
                "Increasing the input energy",
            ],
        },
    ],
};

pub static CHEMISTRY: SubjectBundle = SubjectBundle {
    key: "chemistry",
    keywords: &["chem", "organic", "reaction"],
    prompt_rules: &[
        "Chemical equations must be balanced and written in plain text (H2O, CO2).",
        "Include at least one question that requires reasoning about a reaction outcome.",
        "Use IUPAC names where a compound is named.",
    ],
    mcq_templates: &[
        "Which balanced equation represents the reaction studied in {topic}?",
        "Which type of bond is formed in the compounds discussed in {topic}?",
        "What is the main product of the process described in {topic}?",
        "Which factor increases the rate of the reaction in {topic}?",
    ],
    written_templates: &[
        "Write the balanced equation for the reaction in {topic} and name every product.",
        "Explain the mechanism involved in {topic} step by step.",
        "Compare two compounds from {topic} in terms of structure and properties.",
        "Describe a laboratory test that confirms the product formed in {topic}.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["equation", "balanced"],
            options: ["H2 + O2 -> H2O", "2H2 + O2 -> H2O", "H2 + 2O2 -> 2H2O", "2H2 + O2 -> 2H2O"],
        },
        OptionSet {
            keywords: &["bond"],
            options: ["Metallic bond", "Hydrogen bond", "Ionic bond", "Covalent bond"],
        },
        OptionSet {
            keywords: &["rate", "factor"],
            options: [
                "Lowering the temperature",
                "Reducing concentration",
                "Removing the catalyst",
                "Increasing the temperature",
            ],
        },
    ],
};

pub static COMPUTER: SubjectBundle = SubjectBundle {
    key: "computer",
    keywords: &["computer", "programming", "software", "coding", "algorithm", "data structure"],
    prompt_rules: &[
        "Code snippets must be short, self-contained and written on a single line or with ; separators.",
        "Ask about behaviour, output or complexity rather than syntax trivia.",
        "State the programming language whenever code appears.",
    ],
    mcq_templates: &[
        "What is the time complexity of the core algorithm used in {topic}?",
        "Which data structure is most suitable for the problem addressed by {topic}?",
        "What is the output of a loop that sums the numbers 1 to 4, as used in {topic}?",
        "Which principle does {topic} rely on most directly?",
    ],
    written_templates: &[
        "Write a function that demonstrates {topic} and explain its time complexity.",
        "Trace the execution of a small program that uses {topic} and show the output.",
        "Compare two approaches to {topic} and state when each is preferred.",
        "Design a solution using {topic} for a student record system.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["complexity"],
            options: ["O(n^2)", "O(1)", "O(n)", "O(n log n)"],
        },
        OptionSet {
            keywords: &["data structure"],
            options: ["Stack", "Linked list", "Array", "Hash table"],
        },
        OptionSet {
            keywords: &["output"],
            options: ["4", "6", "24", "10"],
        },
        OptionSet {
            keywords: &["principle"],
            options: ["Inheritance", "Polymorphism", "Encapsulation", "Abstraction"],
        },
    ],
};

pub static BIOLOGY: SubjectBundle = SubjectBundle {
    key: "biology",
    keywords: &["bio", "botany", "zoology", "life science", "genetic"],
    prompt_rules: &[
        "Use correct scientific terminology and name specific organisms or structures.",
        "Include questions on processes, not only on the names of parts.",
        "Diagram questions must specify which parts are to be labelled.",
    ],
    mcq_templates: &[
        "Which organelle is primarily responsible for the process studied in {topic}?",
        "Which statement correctly describes the function discussed in {topic}?",
        "Which process produces energy for the cells involved in {topic}?",
        "Which structure is affected first in the condition described in {topic}?",
    ],
    written_templates: &[
        "Describe the process involved in {topic} and name each stage.",
        "Explain how {topic} helps an organism survive in its environment.",
        "Compare the structures involved in {topic} in plants and animals.",
        "Explain the significance of {topic} for human health.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["organelle"],
            options: ["Ribosome", "Golgi apparatus", "Nucleus", "Mitochondria"],
        },
        OptionSet {
            keywords: &["energy"],
            options: ["Transpiration", "Osmosis", "Diffusion", "Cellular respiration"],
        },
    ],
};

pub static HISTORY: SubjectBundle = SubjectBundle {
    key: "history",
    keywords: &["history", "social", "civics", "geography", "political", "economics"],
    prompt_rules: &[
        "Anchor questions in specific events, dates, people or places.",
        "Include questions on causes and consequences, not only chronology.",
        "Keep questions neutral and free of contemporary political bias.",
    ],
    mcq_templates: &[
        "Which factor was the main cause of the developments studied in {topic}?",
        "Which outcome followed most directly from the events of {topic}?",
        "Which group played the leading role in {topic}?",
        "In which period did the changes associated with {topic} take place?",
    ],
    written_templates: &[
        "Explain the causes and consequences of {topic}.",
        "Assess the role of key individuals in {topic}.",
        "Describe how {topic} changed the lives of ordinary people.",
        "Evaluate the long-term significance of {topic}.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["cause", "factor"],
            options: [
                "Religious reform",
                "Technological change",
                "Foreign invasion",
                "Economic hardship",
            ],
        },
        OptionSet {
            keywords: &["outcome", "followed"],
            options: [
                "Return to the old order",
                "Immediate economic collapse",
                "Complete isolation",
                "Formation of new institutions",
            ],
        },
        OptionSet {
            keywords: &["period"],
            options: ["Ancient period", "Medieval period", "Early modern period", "Modern period"],
        },
    ],
};

pub static LANGUAGE: SubjectBundle = SubjectBundle {
    key: "language",
    keywords: &["english", "language", "literature", "grammar", "poetry", "hindi", "french"],
    prompt_rules: &[
        "Quote short passages or sentences where the question depends on them.",
        "Grammar questions must use a complete example sentence.",
        "Literature questions must name the text or author being discussed.",
    ],
    mcq_templates: &[
        "Which literary device is most prominent in the passage studied in {topic}?",
        "Which sentence is grammatically correct according to the rules of {topic}?",
        "What is the central theme explored in {topic}?",
        "Which word is closest in meaning to the key term used in {topic}?",
    ],
    written_templates: &[
        "Analyse the use of language in {topic} with reference to the text.",
        "Write a short essay discussing the central theme of {topic}.",
        "Explain how the author develops character in {topic}.",
        "Rewrite the given passage from {topic} in reported speech.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["device"],
            options: ["Alliteration", "Hyperbole", "Simile", "Metaphor"],
        },
        OptionSet {
            keywords: &["grammatically"],
            options: [
                "She don't like apples.",
                "They was going home.",
                "He have finished.",
                "She doesn't like apples.",
            ],
        },
        OptionSet {
            keywords: &["theme"],
            options: ["Adventure", "Wealth", "Revenge", "Loss and resilience"],
        },
    ],
};

pub static GENERIC: SubjectBundle = SubjectBundle {
    key: "general",
    keywords: &[],
    prompt_rules: &[
        "Questions must test understanding and application, not memorised definitions.",
        "Each question must be answerable from standard course material.",
        "Vary the cognitive level across the paper.",
    ],
    mcq_templates: &[
        "Which statement best describes the central idea of {topic}?",
        "Which example best illustrates the principle behind {topic}?",
        "Which factor most strongly influences the outcome in {topic}?",
        "Which conclusion is supported by the evidence in {topic}?",
    ],
    written_templates: &[
        "Explain the main concepts of {topic} with suitable examples.",
        "Discuss the importance of {topic} in everyday life.",
        "Compare two different viewpoints related to {topic}.",
        "Describe a situation in which {topic} is applied and analyse the result.",
    ],
    option_bank: &[
        OptionSet {
            keywords: &["example", "illustrates"],
            options: [
                "An unrelated historical anecdote",
                "A purely hypothetical claim",
                "A definition without context",
                "A practical case showing the principle at work",
            ],
        },
        OptionSet {
            keywords: &["factor", "influences"],
            options: [
                "Random chance alone",
                "The order of presentation",
                "The length of the explanation",
                "The underlying conditions of the system",
            ],
        },
    ],
};

/// Last-resort options when no keyword in the question text matches.
pub const FALLBACK_OPTIONS: [&str; 4] = [
    "It applies only in theoretical situations",
    "It has no practical significance",
    "It contradicts established principles",
    "It explains the observed outcome correctly",
];

static BUNDLES: [&SubjectBundle; 7] = [
    &MATH, &PHYSICS, &CHEMISTRY, &COMPUTER, &BIOLOGY, &HISTORY, &LANGUAGE,
];

pub fn lookup(subject: &str) -> &'static SubjectBundle {
    let needle = subject.to_lowercase();
    BUNDLES
        .iter()
        .copied()
        .find(|bundle| bundle.keywords.iter().any(|kw| needle.contains(kw)))
        .unwrap_or(&GENERIC)
}

impl SubjectBundle {
    /// First option set whose keyword occurs in `text`, searching this bundle then the generic bank.
    pub fn options_for(&self, text: &str) -> [&'static str; 4] {
        let haystack = text.to_lowercase();
        self.option_bank
            .iter()
            .chain(GENERIC.option_bank.iter())
            .find(|set| set.keywords.iter().any(|kw| haystack.contains(kw)))
            .map(|set| set.options)
            .unwrap_or(FALLBACK_OPTIONS)
    }
}
