//! Suggested-prompt carousel

use assistant_common::Locale;
use rand::seq::SliceRandom;

/// Locale-specific suggested prompts with a movable visible window
#[derive(Debug, Clone)]
pub struct SuggestionCarousel {
    prompts: Vec<&'static str>,
    start: usize,
}

impl SuggestionCarousel {
    /// Prompts for `locale`, shuffled
    pub fn new(locale: Locale) -> Self {
        let mut carousel = Self {
            prompts: locale.suggested_prompts().to_vec(),
            start: 0,
        };
        carousel.shuffle();
        carousel
    }

    pub fn shuffle(&mut self) {
        self.prompts.shuffle(&mut rand::thread_rng());
    }

    /// Move the window one prompt forward, stopping past the last one
    pub fn scroll_left(&mut self) {
        self.start = (self.start + 1).min(self.prompts.len());
    }

    /// Move the window one prompt back, stopping at the first one
    pub fn scroll_right(&mut self) {
        self.start = self.start.saturating_sub(1);
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Prompts from the window start onwards
    pub fn visible(&self) -> &[&'static str] {
        &self.prompts[self.start..]
    }

    pub fn prompts(&self) -> &[&'static str] {
        &self.prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_keeps_the_same_prompts() {
        let mut carousel = SuggestionCarousel::new(Locale::EnUs);
        carousel.shuffle();

        let mut shuffled = carousel.prompts().to_vec();
        let mut expected = Locale::EnUs.suggested_prompts().to_vec();
        shuffled.sort_unstable();
        expected.sort_unstable();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut carousel = SuggestionCarousel::new(Locale::Hr);
        let len = carousel.prompts().len();

        carousel.scroll_right();
        assert_eq!(carousel.start(), 0);

        for _ in 0..len + 5 {
            carousel.scroll_left();
        }
        assert_eq!(carousel.start(), len);
        assert!(carousel.visible().is_empty());

        carousel.scroll_right();
        assert_eq!(carousel.visible().len(), 1);
    }
}
