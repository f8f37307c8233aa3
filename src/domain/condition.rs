//! Condition checklist scoring and the price suggestion derived from it.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Page,
    Binding,
    Cover,
    Damages,
    Accessories,
}

impl ConditionCategory {
    pub const ALL: [ConditionCategory; 5] = [
        ConditionCategory::Page,
        ConditionCategory::Binding,
        ConditionCategory::Cover,
        ConditionCategory::Damages,
        ConditionCategory::Accessories,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConditionCategory::Page => "Pages",
            ConditionCategory::Binding => "Binding",
            ConditionCategory::Cover => "Cover",
            ConditionCategory::Damages => "Damage",
            ConditionCategory::Accessories => "Accessories",
        }
    }

    pub fn flags(&self) -> [ConditionFlag; 3] {
        match self {
            ConditionCategory::Page => [
                ConditionFlag::PageNoMissing,
                ConditionFlag::PageNoTorn,
                ConditionFlag::PageClean,
            ],
            ConditionCategory::Binding => [
                ConditionFlag::BindingNoLoose,
                ConditionFlag::BindingNoFalling,
                ConditionFlag::BindingStable,
            ],
            ConditionCategory::Cover => [
                ConditionFlag::CoverNoDetachment,
                ConditionFlag::CoverClean,
                ConditionFlag::CoverNoScratches,
            ],
            ConditionCategory::Damages => [
                ConditionFlag::DamageNoBurns,
                ConditionFlag::DamageNoSmell,
                ConditionFlag::DamageNoInsects,
            ],
            ConditionCategory::Accessories => [
                ConditionFlag::AccessoriesComplete,
                ConditionFlag::AccessoriesContent,
                ConditionFlag::AccessoriesExtras,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionFlag {
    PageNoMissing,
    PageNoTorn,
    PageClean,
    BindingNoLoose,
    BindingNoFalling,
    BindingStable,
    CoverNoDetachment,
    CoverClean,
    CoverNoScratches,
    DamageNoBurns,
    DamageNoSmell,
    DamageNoInsects,
    AccessoriesComplete,
    AccessoriesContent,
    AccessoriesExtras,
}

impl ConditionFlag {
    pub fn weight(&self) -> u8 {
        match self {
            ConditionFlag::PageNoMissing => 40,
            ConditionFlag::PageNoTorn => 30,
            ConditionFlag::PageClean => 30,
            ConditionFlag::BindingNoLoose => 40,
            ConditionFlag::BindingNoFalling => 40,
            ConditionFlag::BindingStable => 20,
            ConditionFlag::CoverNoDetachment => 50,
            ConditionFlag::CoverClean => 25,
            ConditionFlag::CoverNoScratches => 25,
            ConditionFlag::DamageNoBurns => 40,
            ConditionFlag::DamageNoSmell => 30,
            ConditionFlag::DamageNoInsects => 30,
            ConditionFlag::AccessoriesComplete => 50,
            ConditionFlag::AccessoriesContent => 50,
            ConditionFlag::AccessoriesExtras => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConditionFlag::PageNoMissing => "No missing pages",
            ConditionFlag::PageNoTorn => "No torn pages",
            ConditionFlag::PageClean => "Pages free of stains and marks",
            ConditionFlag::BindingNoLoose => "Binding is not loose",
            ConditionFlag::BindingNoFalling => "No pages falling out",
            ConditionFlag::BindingStable => "Spine is stable",
            ConditionFlag::CoverNoDetachment => "Cover firmly attached",
            ConditionFlag::CoverClean => "Cover is clean",
            ConditionFlag::CoverNoScratches => "No deep scratches",
            ConditionFlag::DamageNoBurns => "No burn damage",
            ConditionFlag::DamageNoSmell => "No strong odours",
            ConditionFlag::DamageNoInsects => "No insect damage",
            ConditionFlag::AccessoriesComplete => "All accessories included",
            ConditionFlag::AccessoriesContent => "Content is complete",
            ConditionFlag::AccessoriesExtras => "Bonus extras included",
        }
    }

    pub fn category(&self) -> ConditionCategory {
        match self {
            ConditionFlag::PageNoMissing | ConditionFlag::PageNoTorn | ConditionFlag::PageClean => {
                ConditionCategory::Page
            }
            ConditionFlag::BindingNoLoose
            | ConditionFlag::BindingNoFalling
            | ConditionFlag::BindingStable => ConditionCategory::Binding,
            ConditionFlag::CoverNoDetachment
            | ConditionFlag::CoverClean
            | ConditionFlag::CoverNoScratches => ConditionCategory::Cover,
            ConditionFlag::DamageNoBurns
            | ConditionFlag::DamageNoSmell
            | ConditionFlag::DamageNoInsects => ConditionCategory::Damages,
            ConditionFlag::AccessoriesComplete
            | ConditionFlag::AccessoriesContent
            | ConditionFlag::AccessoriesExtras => ConditionCategory::Accessories,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCondition {
    #[serde(rename = "page_no_missing")]
    pub no_missing: bool,
    #[serde(rename = "page_no_torn")]
    pub no_torn: bool,
    #[serde(rename = "page_clean")]
    pub clean: bool,
    #[serde(rename = "page_score")]
    pub score: u8,
}

impl Default for PageCondition {
    fn default() -> Self {
        Self {
            no_missing: true,
            no_torn: true,
            clean: true,
            score: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingCondition {
    #[serde(rename = "binding_no_loose")]
    pub no_loose: bool,
    #[serde(rename = "binding_no_falling")]
    pub no_falling: bool,
    #[serde(rename = "binding_stable")]
    pub stable: bool,
    #[serde(rename = "binding_score")]
    pub score: u8,
}

impl Default for BindingCondition {
    fn default() -> Self {
        Self {
            no_loose: true,
            no_falling: true,
            stable: true,
            score: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverCondition {
    #[serde(rename = "cover_no_detachment")]
    pub no_detachment: bool,
    #[serde(rename = "cover_clean")]
    pub clean: bool,
    #[serde(rename = "cover_no_scratches")]
    pub no_scratches: bool,
    #[serde(rename = "cover_score")]
    pub score: u8,
}

impl Default for CoverCondition {
    fn default() -> Self {
        Self {
            no_detachment: true,
            clean: true,
            no_scratches: true,
            score: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageCondition {
    #[serde(rename = "damage_no_burns")]
    pub no_burns: bool,
    #[serde(rename = "damage_no_smell")]
    pub no_smell: bool,
    #[serde(rename = "damage_no_insects")]
    pub no_insects: bool,
    #[serde(rename = "damage_score")]
    pub score: u8,
}

impl Default for DamageCondition {
    fn default() -> Self {
        Self {
            no_burns: true,
            no_smell: true,
            no_insects: true,
            score: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoriesCondition {
    #[serde(rename = "accessories_complete")]
    pub complete: bool,
    #[serde(rename = "accessories_content")]
    pub content: bool,
    #[serde(rename = "accessories_extras")]
    pub extras: bool,
    #[serde(rename = "accessories_score")]
    pub score: u8,
}

impl Default for AccessoriesCondition {
    fn default() -> Self {
        Self {
            complete: true,
            content: true,
            extras: false,
            score: 100,
        }
    }
}

/// Buyer-visible checklist for one book, grouped the way the listing API
/// expects it. Stored scores are kept in sync by [`ConditionReport::recompute`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConditionReport {
    pub page: PageCondition,
    pub binding: BindingCondition,
    pub cover: CoverCondition,
    pub damages: DamageCondition,
    pub accessories: AccessoriesCondition,
}

impl ConditionReport {
    pub fn flag(&self, flag: ConditionFlag) -> bool {
        match flag {
            ConditionFlag::PageNoMissing => self.page.no_missing,
            ConditionFlag::PageNoTorn => self.page.no_torn,
            ConditionFlag::PageClean => self.page.clean,
            ConditionFlag::BindingNoLoose => self.binding.no_loose,
            ConditionFlag::BindingNoFalling => self.binding.no_falling,
            ConditionFlag::BindingStable => self.binding.stable,
            ConditionFlag::CoverNoDetachment => self.cover.no_detachment,
            ConditionFlag::CoverClean => self.cover.clean,
            ConditionFlag::CoverNoScratches => self.cover.no_scratches,
            ConditionFlag::DamageNoBurns => self.damages.no_burns,
            ConditionFlag::DamageNoSmell => self.damages.no_smell,
            ConditionFlag::DamageNoInsects => self.damages.no_insects,
            ConditionFlag::AccessoriesComplete => self.accessories.complete,
            ConditionFlag::AccessoriesContent => self.accessories.content,
            ConditionFlag::AccessoriesExtras => self.accessories.extras,
        }
    }

    pub fn toggle(&mut self, flag: ConditionFlag) {
        let slot = self.flag_mut(flag);
        *slot = !*slot;
        self.recompute();
    }

    /// Re-derives every stored category score from the current flags.
    pub fn recompute(&mut self) {
        self.page.score = self.weighted_score(ConditionCategory::Page);
        self.binding.score = self.weighted_score(ConditionCategory::Binding);
        self.cover.score = self.weighted_score(ConditionCategory::Cover);
        self.damages.score = self.weighted_score(ConditionCategory::Damages);
        self.accessories.score = self.weighted_score(ConditionCategory::Accessories);
    }

    pub fn category_score(&self, category: ConditionCategory) -> u8 {
        match category {
            ConditionCategory::Page => self.page.score,
            ConditionCategory::Binding => self.binding.score,
            ConditionCategory::Cover => self.cover.score,
            ConditionCategory::Damages => self.damages.score,
            ConditionCategory::Accessories => self.accessories.score,
        }
    }

    /// Rounded mean of the five category scores. Every weight in the
    /// checklist is a multiple of five, so the mean cannot land on an
    /// exact half and the rounding is unambiguous.
    pub fn overall_score(&self) -> u8 {
        let total: u16 = ConditionCategory::ALL
            .iter()
            .map(|category| u16::from(self.category_score(*category)))
            .sum();
        ((total + 2) / 5) as u8
    }

    fn weighted_score(&self, category: ConditionCategory) -> u8 {
        category
            .flags()
            .iter()
            .filter(|flag| self.flag(**flag))
            .map(|flag| flag.weight())
            .sum()
    }

    fn flag_mut(&mut self, flag: ConditionFlag) -> &mut bool {
        match flag {
            ConditionFlag::PageNoMissing => &mut self.page.no_missing,
            ConditionFlag::PageNoTorn => &mut self.page.no_torn,
            ConditionFlag::PageClean => &mut self.page.clean,
            ConditionFlag::BindingNoLoose => &mut self.binding.no_loose,
            ConditionFlag::BindingNoFalling => &mut self.binding.no_falling,
            ConditionFlag::BindingStable => &mut self.binding.stable,
            ConditionFlag::CoverNoDetachment => &mut self.cover.no_detachment,
            ConditionFlag::CoverClean => &mut self.cover.clean,
            ConditionFlag::CoverNoScratches => &mut self.cover.no_scratches,
            ConditionFlag::DamageNoBurns => &mut self.damages.no_burns,
            ConditionFlag::DamageNoSmell => &mut self.damages.no_smell,
            ConditionFlag::DamageNoInsects => &mut self.damages.no_insects,
            ConditionFlag::AccessoriesComplete => &mut self.accessories.complete,
            ConditionFlag::AccessoriesContent => &mut self.accessories.content,
            ConditionFlag::AccessoriesExtras => &mut self.accessories.extras,
        }
    }
}

// Drafts saved by older builds may carry a different checklist shape.
// Anything that does not deserialize cleanly becomes the default report,
// and stored scores are always re-derived from the flags.
impl<'de> Deserialize<'de> for ConditionReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Blocks {
            page: PageCondition,
            binding: BindingCondition,
            cover: CoverCondition,
            damages: DamageCondition,
            accessories: AccessoriesCondition,
        }

        let value = serde_json::Value::deserialize(deserializer)?;
        let mut report = match serde_json::from_value::<Blocks>(value) {
            Ok(blocks) => ConditionReport {
                page: blocks.page,
                binding: blocks.binding,
                cover: blocks.cover,
                damages: blocks.damages,
                accessories: blocks.accessories,
            },
            Err(_) => ConditionReport::default(),
        };
        report.recompute();
        Ok(report)
    }
}

pub fn suggested_price(market_price: f64, overall_score: u8) -> u64 {
    if !market_price.is_finite() || market_price <= 0.0 {
        return 0;
    }
    (market_price * f64::from(overall_score) / 100.0).floor() as u64
}

pub fn condition_label(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => "Excellent",
        75..=89 => "Very good",
        50..=74 => "Good",
        25..=49 => "Worn",
        _ => "Poor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_report_scores_a_hundred() {
        let report = ConditionReport::default();
        for category in ConditionCategory::ALL {
            assert_eq!(report.category_score(category), 100, "{category:?}");
        }
        assert_eq!(report.overall_score(), 100);
        assert!(!report.flag(ConditionFlag::AccessoriesExtras));
    }

    #[test]
    fn each_category_can_reach_a_perfect_score() {
        for category in ConditionCategory::ALL {
            let total: u8 = category.flags().iter().map(|flag| flag.weight()).sum();
            assert_eq!(total, 100, "{category:?}");
        }
    }

    #[test]
    fn category_scores_follow_the_weight_table() {
        for category in ConditionCategory::ALL {
            let flags = category.flags();
            for mask in 0u8..8 {
                let mut report = ConditionReport::default();
                for (index, flag) in flags.iter().enumerate() {
                    let wanted = mask & (1 << index) != 0;
                    if report.flag(*flag) != wanted {
                        report.toggle(*flag);
                    }
                }
                let expected: u8 = flags
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| mask & (1 << index) != 0)
                    .map(|(_, flag)| flag.weight())
                    .sum();
                assert_eq!(
                    report.category_score(category),
                    expected,
                    "{category:?} mask {mask:03b}"
                );
            }
        }
    }

    #[test]
    fn overall_score_is_the_mean_of_the_categories() {
        let mut report = ConditionReport::default();
        report.toggle(ConditionFlag::CoverClean);
        assert_eq!(report.category_score(ConditionCategory::Cover), 75);
        assert_eq!(report.overall_score(), 95);

        let mut wrecked = ConditionReport::default();
        for category in ConditionCategory::ALL {
            for flag in category.flags() {
                if wrecked.flag(flag) {
                    wrecked.toggle(flag);
                }
            }
        }
        assert_eq!(wrecked.overall_score(), 0);
    }

    #[test]
    fn overall_score_rounds_to_nearest() {
        let mut report = ConditionReport::default();
        report.page.score = 100;
        report.binding.score = 100;
        report.cover.score = 100;
        report.damages.score = 100;

        report.accessories.score = 98;
        assert_eq!(report.overall_score(), 100);

        report.accessories.score = 97;
        assert_eq!(report.overall_score(), 99);

        report.accessories.score = 0;
        assert_eq!(report.overall_score(), 80);
    }

    #[test]
    fn zero_weight_extras_never_move_the_score() {
        let mut report = ConditionReport::default();
        report.toggle(ConditionFlag::AccessoriesExtras);
        assert!(report.flag(ConditionFlag::AccessoriesExtras));
        assert_eq!(report.category_score(ConditionCategory::Accessories), 100);
        assert_eq!(report.overall_score(), 100);
    }

    #[test]
    fn toggling_twice_restores_the_report() {
        let mut report = ConditionReport::default();
        let pristine = report.clone();
        report.toggle(ConditionFlag::BindingNoLoose);
        assert_ne!(report, pristine);
        report.toggle(ConditionFlag::BindingNoLoose);
        assert_eq!(report, pristine);
    }

    #[test]
    fn suggested_price_scales_and_floors() {
        assert_eq!(suggested_price(1500.0, 100), 1500);
        assert_eq!(suggested_price(1500.0, 80), 1200);
        assert_eq!(suggested_price(1000.0, 73), 730);
        assert_eq!(suggested_price(999.99, 100), 999);
        assert_eq!(suggested_price(101.0, 33), 33);
    }

    #[test]
    fn suggested_price_treats_bad_input_as_zero() {
        assert_eq!(suggested_price(0.0, 100), 0);
        assert_eq!(suggested_price(-50.0, 90), 0);
        assert_eq!(suggested_price(f64::NAN, 90), 0);
        assert_eq!(suggested_price(f64::INFINITY, 90), 0);
    }

    #[test]
    fn report_round_trips_through_the_wire_format() {
        let mut report = ConditionReport::default();
        report.toggle(ConditionFlag::PageClean);
        report.toggle(ConditionFlag::DamageNoSmell);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["page"]["page_no_missing"], json!(true));
        assert_eq!(value["page"]["page_clean"], json!(false));
        assert_eq!(value["page"]["page_score"], json!(70));
        assert_eq!(value["accessories"]["accessories_extras"], json!(false));

        let parsed: ConditionReport = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn unrecognized_draft_shapes_reset_to_default() {
        let stale = json!({
            "page": { "missing_pages": 2, "torn": false },
            "binding": {},
        });
        let parsed: ConditionReport = serde_json::from_value(stale).unwrap();
        assert_eq!(parsed, ConditionReport::default());
    }

    #[test]
    fn stored_scores_are_rederived_on_load() {
        let tampered = json!({
            "page": {
                "page_no_missing": false,
                "page_no_torn": false,
                "page_clean": false,
                "page_score": 100,
            },
            "binding": BindingCondition::default(),
            "cover": CoverCondition::default(),
            "damages": DamageCondition::default(),
            "accessories": AccessoriesCondition::default(),
        });
        let parsed: ConditionReport = serde_json::from_value(tampered).unwrap();
        assert_eq!(parsed.category_score(ConditionCategory::Page), 0);
        assert_eq!(parsed.overall_score(), 80);
    }

    #[test]
    fn condition_labels_cover_the_tiers() {
        assert_eq!(condition_label(100), "Excellent");
        assert_eq!(condition_label(90), "Excellent");
        assert_eq!(condition_label(80), "Very good");
        assert_eq!(condition_label(60), "Good");
        assert_eq!(condition_label(30), "Worn");
        assert_eq!(condition_label(10), "Poor");
    }

    #[test]
    fn every_flag_reports_its_own_category() {
        for category in ConditionCategory::ALL {
            for flag in category.flags() {
                assert_eq!(flag.category(), category);
            }
        }
    }
}
