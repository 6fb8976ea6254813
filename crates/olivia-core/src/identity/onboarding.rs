//! Onboarding pages and pager state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingPage {
    pub title: &'static str,
    pub description: &'static str,
}

pub const ONBOARDING_PAGES: [OnboardingPage; 6] = [
    OnboardingPage {
        title: "Welcome to Olivia AI",
        description: "Your personal AI winggirl to guide you through dating with confidence.",
    },
    OnboardingPage {
        title: "Confidence & Control",
        description: "Olivia helps you make the right moves with personalized advice.",
    },
    OnboardingPage {
        title: "Spot Red Flags",
        description: "Stay ahead by identifying potential issues before they arise.",
    },
    OnboardingPage {
        title: "Status & Success",
        description: "Level up your dating game and achieve your goals with Olivia.",
    },
    OnboardingPage {
        title: "Trusted by Many",
        description: "Hear from users who've transformed their dating lives with Olivia.",
    },
    OnboardingPage {
        title: "Create Your Account to Get Started",
        description: "Ready to take control of your dating journey? Let's go!",
    },
];

/// Position in the onboarding pager.
#[derive(Debug, Clone, Default)]
pub struct OnboardingFlow {
    current: usize,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &'static OnboardingPage {
        &ONBOARDING_PAGES[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == ONBOARDING_PAGES.len()
    }

    /// Move to the next page. Returns `false` when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Completed fraction, for the progress bar (1/6 on the first page).
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / ONBOARDING_PAGES.len() as f64
    }
}
