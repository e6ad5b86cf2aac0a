//! Static deck content — workflows, their sections, and panel data.
//!
//! Colours are plain RGB triples so this module stays free of any
//! rendering crate; the UI layer converts them.

// ───────────────────────────────────────── colours ───────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend toward `other` by `t` in `[0, 1]`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb(ch(self.0, other.0), ch(self.1, other.1), ch(self.2, other.2))
    }
}

/// Three-stop horizontal gradient (`from`, `via`, `to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient(pub Rgb, pub Rgb, pub Rgb);

impl Gradient {
    /// Colour at position `t` in `[0, 1]` along the gradient.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            self.0.mix(self.1, t * 2.0)
        } else {
            self.1.mix(self.2, (t - 0.5) * 2.0)
        }
    }
}

mod palette {
    use super::Rgb;

    pub const PURPLE: Rgb = Rgb(0x93, 0x33, 0xea);
    pub const PINK: Rgb = Rgb(0xdb, 0x27, 0x77);
    pub const RED: Rgb = Rgb(0xdc, 0x26, 0x26);
    pub const BLUE: Rgb = Rgb(0x25, 0x63, 0xeb);
    pub const CYAN: Rgb = Rgb(0x08, 0x91, 0xb2);
    pub const TEAL: Rgb = Rgb(0x0d, 0x94, 0x88);
    pub const ORANGE: Rgb = Rgb(0xea, 0x58, 0x0c);
    pub const YELLOW: Rgb = Rgb(0xca, 0x8a, 0x04);
    pub const AMBER: Rgb = Rgb(0xd9, 0x77, 0x06);
    pub const GREEN: Rgb = Rgb(0x16, 0xa3, 0x4a);
    pub const EMERALD: Rgb = Rgb(0x05, 0x96, 0x69);
    pub const INDIGO: Rgb = Rgb(0x4f, 0x46, 0xe5);
    pub const SLATE: Rgb = Rgb(0xe2, 0xe8, 0xf0);
    pub const GRAY: Rgb = Rgb(0xd1, 0xd5, 0xdb);
    pub const GRAY_DARK: Rgb = Rgb(0x9c, 0xa3, 0xaf);
}

use palette::*;

// ───────────────────────────────────────── sections ──────────

/// One horizontally laid-out panel of a workflow.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub title: &'static str,
    /// May contain `<strong>` emphasis; see [`parse_markup`].
    pub subtitle: &'static str,
    pub gradient: Gradient,
}

/// A run of subtitle text with its emphasis flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub strong: bool,
}

/// Split `<strong>…</strong>` markup into runs.  Unknown tags are kept as
/// text; an unterminated `<strong>` emphasises the rest of the string.
pub fn parse_markup(s: &str) -> Vec<Run> {
    const OPEN: &str = "<strong>";
    const CLOSE: &str = "</strong>";

    let mut runs = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let Some(start) = rest.find(OPEN) else {
            runs.push(Run { text: rest.to_string(), strong: false });
            break;
        };
        if start > 0 {
            runs.push(Run { text: rest[..start].to_string(), strong: false });
        }
        let inner = &rest[start + OPEN.len()..];
        match inner.find(CLOSE) {
            Some(end) => {
                if end > 0 {
                    runs.push(Run { text: inner[..end].to_string(), strong: true });
                }
                rest = &inner[end + CLOSE.len()..];
            }
            None => {
                if !inner.is_empty() {
                    runs.push(Run { text: inner.to_string(), strong: true });
                }
                break;
            }
        }
    }
    runs
}

// ───────────────────────────────────────── workflows ─────────

/// Selectable deck experiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowId {
    Home,
    Materials,
    DigitalTwin,
    Spectra,
}

impl WorkflowId {
    /// Workflows listed on the home screen, in display order.
    pub const SELECTABLE: &[WorkflowId] = &[
        WorkflowId::Materials,
        WorkflowId::DigitalTwin,
        WorkflowId::Spectra,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkflowId::Home => "personal demo space",
            WorkflowId::Materials => "MaterialsAI",
            WorkflowId::DigitalTwin => "PredictLab",
            WorkflowId::Spectra => "DeepSpectrum",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            WorkflowId::Home => "select a workflow to explore",
            WorkflowId::Materials => "materials informatics workflow",
            WorkflowId::DigitalTwin => "testing station for predictive models",
            WorkflowId::Spectra => "spectra matching with AI",
        }
    }

    pub fn gradient(self) -> Gradient {
        match self {
            WorkflowId::Home => Gradient(SLATE, GRAY, GRAY_DARK),
            WorkflowId::Materials => Gradient(PURPLE, PINK, RED),
            WorkflowId::DigitalTwin => Gradient(CYAN, BLUE, INDIGO),
            WorkflowId::Spectra => Gradient(AMBER, ORANGE, RED),
        }
    }

    pub fn sections(self) -> &'static [Section] {
        match self {
            WorkflowId::Home => HOME_SECTIONS,
            WorkflowId::Materials => MATERIALS_SECTIONS,
            WorkflowId::DigitalTwin => DIGITAL_TWIN_SECTIONS,
            WorkflowId::Spectra => SPECTRA_SECTIONS,
        }
    }
}

static HOME_SECTIONS: &[Section] = &[Section {
    title: "personal demo space",
    subtitle: "Select a workflow to explore",
    gradient: Gradient(SLATE, GRAY, GRAY_DARK),
}];

/// Materials workflow section indices with interactive panels.
pub mod materials {
    pub const GENERATE: usize = 1;
    pub const PREDICT: usize = 2;
    pub const SELECT: usize = 3;
    pub const VALIDATE: usize = 4;
    pub const INDUSTRIES: usize = 5;
    pub const IMPACT: usize = 6;
}

static MATERIALS_SECTIONS: &[Section] = &[
    Section {
        title: "overview",
        subtitle: "Imagine you want to discover <strong>new materials</strong>. You would start from existing ones and change their structure one at a time, testing each variation to see if it has the desired properties. This is <strong>slow and expensive</strong>. Now, imagine a tool that optimizes the entire process, accelerating the discovery of new materials with desired properties. This is where <strong>AI comes in</strong>.",
        gradient: Gradient(PURPLE, PINK, RED),
    },
    Section {
        title: "generate",
        subtitle: "Leverage <strong>combinatorial and data-driven techniques</strong> to explore vast chemical spaces and identify promising candidates. Use <strong>GenAI models</strong> to create novel material structures with desired properties.",
        gradient: Gradient(BLUE, CYAN, TEAL),
    },
    Section {
        title: "predict",
        subtitle: "Trained on <strong>extensive and modern datasets</strong>, Machine Learning and Deep Learning models can <strong>accurately predict material properties</strong>, enabling rapid screening of candidates.",
        gradient: Gradient(ORANGE, RED, PINK),
    },
    Section {
        title: "select",
        subtitle: "Select top candidates based on <strong>target criteria</strong> such as conductivity, stability, toxicity, or binding affinity. Focus resources on <strong>high-potential molecules</strong>.",
        gradient: Gradient(YELLOW, AMBER, ORANGE),
    },
    Section {
        title: "validate",
        subtitle: "Scientists validate candidates through <strong>computational chemistry and laboratory experiments</strong>, testing only a <strong>reduced number of high-potential candidates</strong> instead of thousands of compounds.",
        gradient: Gradient(GREEN, EMERALD, TEAL),
    },
    Section {
        title: "industries",
        subtitle: "Materials informatics is transforming <strong>multiple sectors</strong>, from automotive to pharmaceuticals, enabling <strong>targeted innovation</strong>.",
        gradient: Gradient(BLUE, CYAN, TEAL),
    },
    Section {
        title: "impact",
        subtitle: "<strong>Accelerate innovation</strong> and reduce the time and cost of material discovery for <strong>energy storage, pharmaceutics, catalysis, and electronics</strong>.",
        gradient: Gradient(INDIGO, PURPLE, PINK),
    },
];

/// Digital-twin workflow section indices.
pub mod digital_twin {
    pub const DATASET: usize = 0;
    pub const MODELS: usize = 1;
    pub const TRAIN: usize = 2;
    pub const IMPORTANCE: usize = 3;
    /// Every section hosts the lab.
    pub const LAB_SECTIONS: [usize; 4] = [DATASET, MODELS, TRAIN, IMPORTANCE];
}

static DIGITAL_TWIN_SECTIONS: &[Section] = &[
    Section {
        title: "select dataset",
        subtitle: "Choose a <strong>dataset</strong> to begin your machine learning workflow",
        gradient: Gradient(CYAN, BLUE, INDIGO),
    },
    Section {
        title: "choose models",
        subtitle: "Select one or more <strong>classification models</strong> to train on your dataset",
        gradient: Gradient(BLUE, INDIGO, PURPLE),
    },
    Section {
        title: "train models",
        subtitle: "Watch your models <strong>train</strong> and evaluate their performance",
        gradient: Gradient(PURPLE, PINK, RED),
    },
    Section {
        title: "feature importance",
        subtitle: "Discover which <strong>sensors and variables</strong> influence model predictions the most",
        gradient: Gradient(GREEN, EMERALD, TEAL),
    },
];

static SPECTRA_SECTIONS: &[Section] = &[Section {
    title: "overview",
    subtitle: "Food & Beverage screening workflow - <strong>content coming soon</strong>",
    gradient: Gradient(AMBER, ORANGE, RED),
}];

// ───────────────────────────────────────── panel data ────────

#[derive(Debug, Clone, Copy)]
pub struct Industry {
    pub title: &'static str,
    pub gradient: Gradient,
    pub use_cases: &'static [&'static str],
}

pub static INDUSTRIES: &[Industry] = &[
    Industry {
        title: "Automotive",
        gradient: Gradient(Rgb(0x60, 0xa5, 0xfa), Rgb(0x3b, 0xbc, 0xf6), Rgb(0x22, 0xd3, 0xee)),
        use_cases: &[
            "Selecting the right alloy composition for a structural component based on target weight and strength.",
            "Comparing candidate battery materials on conductivity and stability before running lab experiments.",
        ],
    },
    Industry {
        title: "Energy",
        gradient: Gradient(Rgb(0xfa, 0xcc, 0x15), Rgb(0xf8, 0x9f, 0x16), Rgb(0xf9, 0x73, 0x16)),
        use_cases: &[
            "Screening solar cell material formulations to find the best trade-off between efficiency and durability.",
            "Identifying which catalyst variants are worth testing for hydrogen production, reducing lab iterations.",
        ],
    },
    Industry {
        title: "Pharma",
        gradient: Gradient(Rgb(0x34, 0xd3, 0x99), Rgb(0x1d, 0xb5, 0x81), Rgb(0x05, 0x96, 0x69)),
        use_cases: &[
            "Predicting how a drug formulation will behave over time based on its ingredient composition.",
            "Selecting excipients that improve shelf life and dissolution without extensive stability tests.",
        ],
    },
    Industry {
        title: "Manufacturing",
        gradient: Gradient(Rgb(0xa7, 0x8b, 0xfa), Rgb(0xc9, 0x6b, 0xd1), Rgb(0xec, 0x48, 0x99)),
        use_cases: &[
            "Choosing the right protective coating for a given environment based on properties and conditions.",
            "Evaluating new powder materials for 3D printing before committing to full production runs.",
        ],
    },
];

#[derive(Debug, Clone, Copy)]
pub struct ImpactMetric {
    pub target: f64,
    pub decimals: u8,
    pub suffix: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub reference: &'static str,
}

pub static IMPACT_METRICS: &[ImpactMetric] = &[
    ImpactMetric {
        target: 4.5,
        decimals: 1,
        suffix: "x",
        label: "Faster Time-to-Market",
        description: "AI-powered platforms compress drug discovery from 4.5 years to 12 months, accelerating candidate identification and reducing synthesis cycles.",
        reference: "[Exscientia, UKRI 2023; Insilico Medicine 2024]",
    },
    ImpactMetric {
        target: 76.0,
        decimals: 0,
        suffix: "%",
        label: "Prediction Accuracy",
        description: "Advanced ML models achieve 74-76% accuracy in protein-ligand binding predictions, outperforming traditional computational methods.",
        reference: "[AlphaFold 3, DeepMind 2024; Atomwise 2024]",
    },
    ImpactMetric {
        target: 50.0,
        decimals: 0,
        suffix: "%",
        label: "Cost Reduction",
        description: "Companies save millions annually through AI-optimized compound screening, automated synthesis, and predictive modeling.",
        reference: "[Exscientia AWS 2024; Insilico Medicine 2021]",
    },
];

/// Library the molecule grid samples from.
pub static MOLECULE_SMILES: &[&str] = &[
    "CC(=O)OC1=CC=CC=C1C(=O)O",
    "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",
    "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O",
    "CC(=O)NC1=CC=C(C=C1)O",
    "C1=CC=C(C=C1)C=O",
    "CC(C)NCC(COC1=CC=CC=C1)O",
    "CN(C)CCC=C1C2=CC=CC=C2CCC3=CC=CC=C13",
    "CC1=CC=C(C=C1)C(=O)O",
    "C1=CC=C2C(=C1)C(=CN2)CCN",
    "CC(C)CC1=CC=C(C=C1)C(C)C",
    "COC1=CC=CC=C1O",
    "C1=CC(=CC=C1O)O",
    "C1=CC=C(C=C1)N",
    "CC(C)C1=CC=CC=C1",
    "C1=CC=C(C=C1)Cl",
    "CC1=CC=CC=C1C",
    "C1=CC=C(C=C1)C(=O)C2=CC=CC=C2",
    "C1=CC=C(C=C1)C#N",
    "CC1=CC=C(C=C1)N(=O)=O",
    "C1=CC=C(C=C1)S",
    "CC(C)(C)C1=CC=C(C=C1)O",
    "C1=CC=C(C=C1)C(=O)OC",
    "CC1=CC=C(C=C1)C=C",
    "C1=CC=C(C=C1)CC(=O)O",
    "CC(C)OC(=O)C1=CC=CC=C1",
    "C1=CC=C2C(=C1)C=CC=C2",
    "CC1=CC2=C(C=C1)C=CC=C2",
    "C1=CC=C(C=C1)COC2=CC=CC=C2",
    "CC(C)C1=CC=C(C=C1)CC(C)C",
    "C1=CC=C(C=C1)C(C)(C)C",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markup_splits_strong_runs() {
        let runs = parse_markup("a <strong>b</strong> c");
        assert_eq!(
            runs,
            vec![
                Run { text: "a ".into(), strong: false },
                Run { text: "b".into(), strong: true },
                Run { text: " c".into(), strong: false },
            ]
        );
    }

    #[test]
    fn test_parse_markup_edge_cases() {
        assert!(parse_markup("").is_empty());
        assert_eq!(
            parse_markup("<strong>all</strong>"),
            vec![Run { text: "all".into(), strong: true }]
        );
        assert_eq!(
            parse_markup("x <strong>open"),
            vec![
                Run { text: "x ".into(), strong: false },
                Run { text: "open".into(), strong: true },
            ]
        );
    }

    #[test]
    fn test_section_indices_name_the_right_sections() {
        for &wf in WorkflowId::SELECTABLE.iter().chain([WorkflowId::Home].iter()) {
            assert!(!wf.sections().is_empty(), "{wf:?}");
        }
        assert_eq!(MATERIALS_SECTIONS[materials::IMPACT].title, "impact");
        assert_eq!(DIGITAL_TWIN_SECTIONS[digital_twin::TRAIN].title, "train models");
    }

    #[test]
    fn test_gradient_sampling() {
        let g = Gradient(Rgb(0, 0, 0), Rgb(100, 100, 100), Rgb(200, 0, 0));
        assert_eq!(g.sample(0.0), Rgb(0, 0, 0));
        assert_eq!(g.sample(0.5), Rgb(100, 100, 100));
        assert_eq!(g.sample(1.0), Rgb(200, 0, 0));
        assert_eq!(g.sample(0.25), Rgb(50, 50, 50));
    }

    #[test]
    fn test_molecule_library_has_enough_unique_entries() {
        let mut unique: Vec<&str> = MOLECULE_SMILES.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert!(unique.len() >= 25);
    }
}
