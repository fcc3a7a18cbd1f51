use colored::Colorize;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::logic::{BrowsingSession, SessionSummary, TesterAssets};
use crate::scenarios::{SessionPlan, TestScenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    assets: Arc<TesterAssets>,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { assets, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed})",
                        scenario.name.bright_white()
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match self.run_iteration(&scenario.plan, iteration_seed) {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) window {}..={} renders:{} jumps:{}",
                            i + 1,
                            iterations,
                            summary.start_idx,
                            summary.right_bound,
                            summary.metrics.renders,
                            summary.metrics.jumps_accepted
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    fn run_iteration(&self, plan: &SessionPlan, seed: u64) -> anyhow::Result<SessionSummary> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let anchor = plan.entry.anchor(&self.assets, &mut rng);
        let mut session = BrowsingSession::open(
            Arc::clone(&self.assets),
            seed,
            anchor.as_deref(),
            plan.load_policy,
        )?;
        (plan.drive)(&mut session, &mut rng)?;

        let summary = session.summary();
        evaluate_expectations(plan, &summary)?;
        Ok(summary)
    }
}

fn evaluate_expectations(plan: &SessionPlan, summary: &SessionSummary) -> anyhow::Result<()> {
    if let Some(first) = summary.violations.first() {
        anyhow::bail!(
            "{} invariant violation(s), first: {first}",
            summary.violations.len()
        );
    }
    for expectation in &plan.expectations {
        expectation(summary)?;
    }
    Ok(())
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
