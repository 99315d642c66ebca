// src/normalize/floor_plan.rs
//
// Floor-plan labels are free text with full-width and half-width variants,
// and conventions shifted over the years. Everything is folded into a small
// ordered set so charts stay comparable.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FloorPlan {
    Studio,
    OneK,
    OneLdk,
    TwoLdk,
    ThreeLdk,
    FourLdkPlus,
    Other,
}

impl FloorPlan {
    /// Ascending size order; `Other` last.
    pub const ALL: [FloorPlan; 7] = [
        FloorPlan::Studio,
        FloorPlan::OneK,
        FloorPlan::OneLdk,
        FloorPlan::TwoLdk,
        FloorPlan::ThreeLdk,
        FloorPlan::FourLdkPlus,
        FloorPlan::Other,
    ];

    /// Canonical label, as charts and the normalized cache show it.
    pub fn label(self) -> &'static str {
        match self {
            FloorPlan::Studio => "１Ｒ",
            FloorPlan::OneK => "１Ｋ",
            FloorPlan::OneLdk => "１ＬＤＫ",
            FloorPlan::TwoLdk => "２ＬＤＫ",
            FloorPlan::ThreeLdk => "３ＬＤＫ",
            FloorPlan::FourLdkPlus => "４ＬＤＫ",
            FloorPlan::Other => "その他",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            FloorPlan::Studio => "1R",
            FloorPlan::OneK => "1K",
            FloorPlan::OneLdk => "1LDK",
            FloorPlan::TwoLdk => "2LDK",
            FloorPlan::ThreeLdk => "3LDK",
            FloorPlan::FourLdkPlus => "4LDK+",
            FloorPlan::Other => "Other",
        }
    }

    /// Inverse of [`FloorPlan::label`]; used when reading the cache back.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Map a raw upstream label. Total: unknown text lands in `Other`.
    pub fn categorize(raw: &str) -> Self {
        let clean = raw.trim();
        if clean.is_empty() {
            return FloorPlan::Other;
        }
        if let Some(hit) = exact(clean) {
            return hit;
        }
        contains_marker(clean)
    }
}

impl fmt::Display for FloorPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known upstream variants. Several finer layouts are folded together on
/// purpose (1DK and 2K count as 1K, 3K/3DK as 3LDK, 5+ as 4LDK).
fn exact(label: &str) -> Option<FloorPlan> {
    use FloorPlan::*;
    let hit = match label {
        "１Ｒ" => Studio,
        "１Ｋ" | "１ＤＫ" | "２Ｋ" => OneK,
        "１ＬＤＫ" => OneLdk,
        "２ＤＫ" | "２ＬＤＫ" => TwoLdk,
        "３Ｋ" | "３ＤＫ" | "３ＬＤＫ" => ThreeLdk,
        "４Ｋ" | "４ＤＫ" | "４ＬＤＫ" | "５Ｋ以上" | "５ＤＫ以上" | "５ＬＤＫ以上" => FourLdkPlus,
        _ => return None,
    };
    Some(hit)
}

/// Checked smallest first; first containment wins.
const MARKERS: [(FloorPlan, [&str; 2]); 6] = [
    (FloorPlan::Studio, ["１Ｒ", "1R"]),
    (FloorPlan::OneK, ["１Ｋ", "1K"]),
    (FloorPlan::OneLdk, ["１ＬＤＫ", "1LDK"]),
    (FloorPlan::TwoLdk, ["２ＬＤＫ", "2LDK"]),
    (FloorPlan::ThreeLdk, ["３ＬＤＫ", "3LDK"]),
    (FloorPlan::FourLdkPlus, ["４ＬＤＫ", "4LDK"]),
];

fn contains_marker(label: &str) -> FloorPlan {
    MARKERS
        .iter()
        .find(|(_, marks)| marks.iter().any(|m| label.contains(m)))
        .map(|(plan, _)| *plan)
        .unwrap_or(FloorPlan::Other)
}
