//! Exclusive selectors for the analysis category and the market-impact
//! timeframe. The two are independent: switching category never touches the
//! stored timeframe.

use advisor_proto::model::{AnalysisCategory, Timeframe};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySwitch {
    active: AnalysisCategory,
}

impl CategorySwitch {
    pub fn active(&self) -> AnalysisCategory {
        self.active
    }

    pub fn set_category(&mut self, category: AnalysisCategory) {
        self.active = category;
    }

    pub fn next(&mut self) {
        self.active = cycle(&AnalysisCategory::ALL, self.active, 1);
    }

    pub fn prev(&mut self) {
        self.active = cycle(&AnalysisCategory::ALL, self.active, -1);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeframeSwitch {
    active: Timeframe,
}

impl TimeframeSwitch {
    pub fn active(&self) -> Timeframe {
        self.active
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.active = timeframe;
    }

    pub fn next(&mut self) {
        self.active = cycle(&Timeframe::ALL, self.active, 1);
    }

    pub fn prev(&mut self) {
        self.active = cycle(&Timeframe::ALL, self.active, -1);
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
    let len = all.len() as isize;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(idx + step).rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(CategorySwitch::default().active(), AnalysisCategory::Sentiment);
        assert_eq!(TimeframeSwitch::default().active(), Timeframe::Short);
    }

    #[test]
    fn test_set_category_is_idempotent() {
        let mut sw = CategorySwitch::default();
        sw.set_category(AnalysisCategory::Investor);
        sw.set_category(AnalysisCategory::Investor);
        assert_eq!(sw.active(), AnalysisCategory::Investor);
    }

    #[test]
    fn test_category_cycles_wrap() {
        let mut sw = CategorySwitch::default();
        sw.prev();
        assert_eq!(sw.active(), AnalysisCategory::MarketImpact);
        sw.next();
        assert_eq!(sw.active(), AnalysisCategory::Sentiment);
        sw.next();
        assert_eq!(sw.active(), AnalysisCategory::Financial);
    }

    #[test]
    fn test_timeframe_cycles_wrap() {
        let mut tf = TimeframeSwitch::default();
        tf.next();
        tf.next();
        assert_eq!(tf.active(), Timeframe::Long);
        tf.next();
        assert_eq!(tf.active(), Timeframe::Short);
        tf.prev();
        assert_eq!(tf.active(), Timeframe::Long);
    }

    #[test]
    fn test_timeframe_survives_category_round_trip() {
        let mut category = CategorySwitch::default();
        let mut timeframe = TimeframeSwitch::default();
        category.set_category(AnalysisCategory::MarketImpact);
        timeframe.set_timeframe(Timeframe::Long);
        category.set_category(AnalysisCategory::Sentiment);
        category.set_category(AnalysisCategory::MarketImpact);
        assert_eq!(timeframe.active(), Timeframe::Long);
    }
}
