use anyhow::{Result, ensure};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use storefront_core::{Additions, Product};

use crate::logic::{BrowsingSession, LoadPolicy, SessionSummary, TesterAssets};

pub type Drive = fn(&mut BrowsingSession, &mut ChaCha8Rng) -> Result<()>;
pub type Expectation = fn(&SessionSummary) -> Result<()>;

/// Where a session opens the products page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// No anchor in the URL.
    Top,
    /// Anchor to a seeded random category.
    RandomAnchor,
}

impl EntryPoint {
    #[must_use]
    pub fn anchor(self, assets: &TesterAssets, rng: &mut ChaCha8Rng) -> Option<String> {
        match self {
            Self::Top => None,
            Self::RandomAnchor => assets
                .catalog
                .categories
                .choose(rng)
                .map(|cat| format!("#{}", cat.id)),
        }
    }
}

#[derive(Clone)]
pub struct SessionPlan {
    pub entry: EntryPoint,
    pub load_policy: LoadPolicy,
    pub drive: Drive,
    pub expectations: Vec<Expectation>,
}

impl SessionPlan {
    #[must_use]
    pub fn new(entry: EntryPoint, load_policy: LoadPolicy, drive: Drive) -> Self {
        Self {
            entry,
            load_policy,
            drive,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

#[derive(Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: SessionPlan,
}

pub const SCENARIO_KEYS: [&str; 6] = [
    "scroll-to-end",
    "anchored-entry",
    "slow-media",
    "picker-jumps",
    "cart-totals",
    "random-browsing",
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIO_KEYS
        .iter()
        .filter_map(|key| get_scenario(key))
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let scenario = match key.to_lowercase().as_str() {
        "scroll-to-end" | "scroll" => TestScenario {
            key: "scroll-to-end",
            name: "Scroll To End",
            description: "Scroll from the top until every category is mounted",
            plan: SessionPlan::new(EntryPoint::Top, LoadPolicy::Instant, drive_scroll_to_end)
                .with_expectation(expect_covers_end)
                .with_expectation(expect_growth_one_at_a_time),
        },
        "anchored-entry" | "anchored" => TestScenario {
            key: "anchored-entry",
            name: "Anchored Entry",
            description: "Open at a random category anchor and scroll to the end",
            plan: SessionPlan::new(
                EntryPoint::RandomAnchor,
                LoadPolicy::Instant,
                drive_scroll_to_end,
            )
            .with_expectation(expect_start_at_anchor)
            .with_expectation(expect_covers_end),
        },
        "slow-media" => TestScenario {
            key: "slow-media",
            name: "Slow Media",
            description: "Scroll while category media loads late; growth waits for it",
            plan: SessionPlan::new(EntryPoint::Top, LoadPolicy::Deferred, drive_slow_media)
                .with_expectation(expect_covers_end),
        },
        "picker-jumps" | "jumps" => TestScenario {
            key: "picker-jumps",
            name: "Picker Jumps",
            description: "Jump around with the category picker from a random anchor",
            plan: SessionPlan::new(
                EntryPoint::RandomAnchor,
                LoadPolicy::Instant,
                drive_picker_jumps,
            )
            .with_expectation(expect_anchor_per_accepted_jump)
            .with_expectation(expect_start_at_anchor),
        },
        "cart-totals" | "cart" => TestScenario {
            key: "cart-totals",
            name: "Cart Totals",
            description: "Random cart edits; totals must match an independent ledger",
            plan: SessionPlan::new(EntryPoint::Top, LoadPolicy::Instant, drive_cart_edits)
                .with_expectation(expect_cart_matches_ledger),
        },
        "random-browsing" | "random" => TestScenario {
            key: "random-browsing",
            name: "Random Browsing",
            description: "Seeded mix of scrolling, late media, jumps and cart edits",
            plan: SessionPlan::new(
                EntryPoint::RandomAnchor,
                LoadPolicy::Deferred,
                drive_random_browsing,
            )
            .with_expectation(expect_cart_matches_ledger)
            .with_expectation(expect_covers_end),
        },
        _ => return None,
    };
    Some(scenario)
}

fn drive_scroll_to_end(session: &mut BrowsingSession, _rng: &mut ChaCha8Rng) -> Result<()> {
    session.scroll_until_end()?;
    Ok(())
}

fn drive_slow_media(session: &mut BrowsingSession, rng: &mut ChaCha8Rng) -> Result<()> {
    let limit = session.assets().category_count() * 4 + 4;
    for _ in 0..limit {
        if session.window().covers_end() && session.loading_ids().is_empty() {
            return Ok(());
        }
        let bound = session.window().right_bound();
        let was_loading = !session.loading_ids().is_empty();
        session.scroll_to_bottom()?;
        if was_loading {
            ensure!(
                session.window().right_bound() == bound,
                "window grew from {bound} while media was loading"
            );
        }
        if rng.gen_bool(0.6)
            && let Some(id) = session.loading_ids().choose(rng).cloned()
        {
            session.finish_loading(&id)?;
        }
    }
    session.finish_all_loading()?;
    session.scroll_until_end()?;
    Ok(())
}

fn drive_picker_jumps(session: &mut BrowsingSession, rng: &mut ChaCha8Rng) -> Result<()> {
    let count = session.assets().category_count();
    for _ in 0..8 {
        let idx = rng.gen_range(0..count);
        let accepted = session.select_category(idx)?;
        if accepted {
            ensure!(
                session.window().selected_idx() == idx,
                "selected {} after jumping to {idx}",
                session.window().selected_idx()
            );
        } else {
            ensure!(
                idx < session.window().start_idx(),
                "jump to mountable category {idx} was ignored"
            );
        }
    }
    Ok(())
}

fn drive_cart_edits(session: &mut BrowsingSession, rng: &mut ChaCha8Rng) -> Result<()> {
    for _ in 0..24 {
        random_cart_edit(session, rng)?;
    }
    Ok(())
}

fn drive_random_browsing(session: &mut BrowsingSession, rng: &mut ChaCha8Rng) -> Result<()> {
    let count = session.assets().category_count();
    for _ in 0..40 {
        match rng.gen_range(0..6) {
            0 => session.scroll_by(rng.gen_range(-400.0..1200.0))?,
            1 => session.scroll_to_bottom()?,
            2 => {
                if let Some(id) = session.loading_ids().choose(rng).cloned() {
                    session.finish_loading(&id)?;
                }
            }
            3 => {
                session.select_category(rng.gen_range(0..count))?;
            }
            _ => random_cart_edit(session, rng)?,
        }
    }
    session.finish_all_loading()?;
    session.scroll_until_end()?;
    Ok(())
}

fn random_cart_edit(session: &mut BrowsingSession, rng: &mut ChaCha8Rng) -> Result<()> {
    let products: Vec<Product> = session
        .assets()
        .catalog
        .categories
        .iter()
        .flat_map(|cat| cat.products.iter().cloned())
        .collect();
    let Some(product) = products.choose(rng) else {
        return Ok(());
    };

    match rng.gen_range(0..10) {
        0 => session.clear_cart(),
        1 => session.remove_bare(&product.id)?,
        _ => {
            let additions = random_additions(product, rng);
            session.set_count(&product.id, additions, rng.gen_range(0..=3))?;
        }
    }
    Ok(())
}

fn random_additions(product: &Product, rng: &mut ChaCha8Rng) -> Additions {
    let mut additions = Additions::new();
    for sub in &product.sub_products {
        if rng.gen_bool(0.4) {
            additions.insert(sub.id.clone(), rng.gen_range(1..=2));
        }
    }
    for option in &product.options {
        if rng.gen_bool(0.3) {
            additions.insert(option.id.clone(), 1);
        }
    }
    if rng.gen_bool(0.05) {
        additions.insert(String::from("retired-topping"), 1);
    }
    additions
}

fn expect_covers_end(summary: &SessionSummary) -> Result<()> {
    ensure!(
        summary.covers_end,
        "window ended at {} of {} categories",
        summary.right_bound,
        summary.category_count
    );
    Ok(())
}

fn expect_growth_one_at_a_time(summary: &SessionSummary) -> Result<()> {
    ensure!(
        summary.metrics.growth_events == summary.right_bound - summary.initial_right_bound,
        "{} growth events to go from {} to {}",
        summary.metrics.growth_events,
        summary.initial_right_bound,
        summary.right_bound
    );
    Ok(())
}

fn expect_start_at_anchor(summary: &SessionSummary) -> Result<()> {
    let expected = if summary.compact_layout {
        0
    } else {
        summary.opened_at
    };
    ensure!(
        summary.start_idx == expected,
        "window starts at {} instead of {expected}",
        summary.start_idx
    );
    Ok(())
}

fn expect_anchor_per_accepted_jump(summary: &SessionSummary) -> Result<()> {
    ensure!(
        summary.anchor_history.len() == summary.metrics.jumps_accepted,
        "{} anchors published for {} accepted jumps",
        summary.anchor_history.len(),
        summary.metrics.jumps_accepted
    );
    Ok(())
}

fn expect_cart_matches_ledger(summary: &SessionSummary) -> Result<()> {
    ensure!(
        summary.cart_cost == summary.expected_cart_cost,
        "cart cost {} != expected {}",
        summary.cart_cost,
        summary.expected_cart_cost
    );
    ensure!(
        summary.cart_discount == summary.expected_cart_discount,
        "cart discount {} != expected {}",
        summary.cart_discount,
        summary.expected_cart_discount
    );
    ensure!(summary.cart_discount <= 0, "positive discount {}", summary.cart_discount);
    ensure!(
        summary.total_items == summary.expected_total_items,
        "{} items in cart, expected {}",
        summary.total_items,
        summary.expected_total_items
    );
    Ok(())
}
