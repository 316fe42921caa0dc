use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestType {
    Cmj,
    Hj,
    Imtp,
    Ppu,
}

pub fn test_type_order() -> &'static [TestType] {
    &[TestType::Cmj, TestType::Hj, TestType::Imtp, TestType::Ppu]
}

impl TestType {
    pub fn code(self) -> &'static str {
        match self {
            TestType::Cmj => "CMJ",
            TestType::Hj => "HJ",
            TestType::Imtp => "IMTP",
            TestType::Ppu => "PPU",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            TestType::Cmj => "CMJ_",
            TestType::Hj => "HJ_",
            TestType::Imtp => "IMTP_",
            TestType::Ppu => "PPU_",
        }
    }

    /// File stem of the reference export, e.g. `CMJ_ref`.
    pub fn reference_stem(self) -> String {
        format!("{}_ref", self.code())
    }

    /// Column the reference loader ranks by (descending) when keeping one
    /// row per reference athlete.
    pub fn ranking_column(self) -> &'static str {
        match self {
            TestType::Cmj => "cmj_composite_score",
            TestType::Hj => "hop_rsi_avg_best_5",
            TestType::Imtp => "PEAK_VERTICAL_FORCE_Trial_N",
            TestType::Ppu => "PEAK_CONCENTRIC_FORCE_Trial_N",
        }
    }

    pub fn tagged(self, metric_id: &str) -> String {
        format!("{}{}", self.prefix(), metric_id)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CMJ" => Ok(TestType::Cmj),
            "HJ" => Ok(TestType::Hj),
            "IMTP" => Ok(TestType::Imtp),
            "PPU" => Ok(TestType::Ppu),
            other => Err(format!("unknown test type: {other}")),
        }
    }
}
