use serde::{Deserialize, Serialize};

/// A single benchmark program: the name shown in charts and the stem its
/// result files are named after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub stem: String,
}

impl Program {
    pub fn new(name: &str, stem: &str) -> Self {
        Self {
            name: name.to_owned(),
            stem: stem.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub id: String,
    /// Whether charts for this suite carry the auxiliary bar series
    #[serde(default = "default_aux")]
    pub aux: bool,
    /// Reference implementation tag used in avgtime file names, defaults to [`Suite::id`]
    #[serde(default)]
    pub reference: Option<String>,
    pub programs: Vec<Program>,
}

fn default_aux() -> bool {
    true
}

impl Suite {
    fn from_table(id: &str, aux: bool, programs: &[(&str, &str)]) -> Self {
        Self {
            id: id.to_owned(),
            aux,
            reference: None,
            programs: programs
                .iter()
                .map(|(name, stem)| Program::new(name, stem))
                .collect(),
        }
    }

    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or(&self.id)
    }
}

const RODINIA: &[(&str, &str)] = &[
    ("Backprop", "backprop"),
    ("CFD", "cfd"),
    ("HotSpot", "hotspot"),
    ("K-means", "kmeans"),
    ("LavaMD", "lavaMD"),
    ("Myocyte", "myocyte"),
    ("NN", "nn"),
    ("Pathfinder", "pathfinder"),
    ("SRAD", "srad"),
    ("LUD", "lud"),
];

const ACCELERATE: &[(&str, &str)] = &[
    ("Crystal", "crystal"),
    ("Fluid", "fluid"),
    ("Mandelbrot", "mandelbrot"),
    ("N-body", "nbody"),
    ("Tunnel", "tunnel"),
];

const FINPAR: &[(&str, &str)] = &[
    ("LocVolCalib-small", "LocVolCalib_small"),
    ("LocVolCalib-medium", "LocVolCalib_medium"),
    ("LocVolCalib-large", "LocVolCalib_large"),
    ("OptionPricing-small", "OptionPricing_small"),
    ("OptionPricing-medium", "OptionPricing_medium"),
    ("OptionPricing-large", "OptionPricing_large"),
];

const PARBOIL: &[(&str, &str)] = &[
    ("MRI-Q", "mri-q"),
    ("SGEMM", "sgemm"),
    ("Stencil", "stencil"),
    ("TPACF", "tpacf"),
];

/// The built-in suites, in the order reports are produced.
pub fn default_catalog() -> Vec<Suite> {
    vec![
        Suite::from_table("rodinia", true, RODINIA),
        Suite::from_table("accelerate", false, ACCELERATE),
        Suite::from_table("finpar", true, FINPAR),
        Suite::from_table("parboil", true, PARBOIL),
    ]
}
