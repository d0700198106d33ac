//! Evaluation orchestrator

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::aggregator::ScoreAggregator;
use super::critical::CriticalIssueExtractor;
use super::summary::SummaryGenerator;
use crate::categories::{
    BestPracticesEvaluator, Category, CategoryEvaluator, ConnectionsEvaluator, DataFlowEvaluator,
    EfficiencyEvaluator, ExpressionsEvaluator, FunctionalityEvaluator, InapplicableComparator,
    MaintainabilityEvaluator, NodeConfigurationEvaluator, StructuralComparator,
};
use crate::config::{FailurePolicy, FlowgradeConfig};
use crate::error::{FlowgradeError, Result};
use crate::llm::LLMProvider;
use crate::techniques::{BestPracticesRegistry, LLMPromptCategorizer, PromptCategorizer};
use crate::types::{
    BestPracticesResult, CategoryResult, EfficiencyResult, EvaluationInput, EvaluationResult,
    MaintainabilityResult, StructuralSimilarityResult,
};
use crate::validation::check_structural_similarity;

/// Grades a generated workflow across every category.
///
/// All category chains are bound when the evaluator is built, so a judge
/// without structured-output support is rejected before any call is made.
pub struct WorkflowEvaluator {
    functionality: FunctionalityEvaluator,
    connections: ConnectionsEvaluator,
    expressions: ExpressionsEvaluator,
    node_configuration: NodeConfigurationEvaluator,
    efficiency: EfficiencyEvaluator,
    data_flow: DataFlowEvaluator,
    maintainability: MaintainabilityEvaluator,
    best_practices: BestPracticesEvaluator,
    comparator: Arc<dyn StructuralComparator>,
    aggregator: ScoreAggregator,
    summary: SummaryGenerator,
    critical: CriticalIssueExtractor,
    config: FlowgradeConfig,
}

impl std::fmt::Debug for WorkflowEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEvaluator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WorkflowEvaluator {
    /// Evaluator with default configuration, built-in documentation and a
    /// judge-backed categorizer
    pub fn new(provider: Arc<dyn LLMProvider>) -> Result<Self> {
        Self::builder(provider).build()
    }

    pub fn builder(provider: Arc<dyn LLMProvider>) -> WorkflowEvaluatorBuilder {
        WorkflowEvaluatorBuilder::new(provider)
    }

    pub fn config(&self) -> &FlowgradeConfig {
        &self.config
    }

    /// Grade `input`.
    ///
    /// The eight category judges run concurrently, bounded by
    /// `evaluation.max_concurrency`. Aggregation starts only once every
    /// category has settled.
    pub async fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult> {
        let started = Instant::now();
        let semaphore = Semaphore::new(self.config.evaluation.max_concurrency);

        let (
            functionality,
            connections,
            expressions,
            node_configuration,
            efficiency,
            data_flow,
            maintainability,
            best_practices,
        ) = futures::join!(
            run_category(&semaphore, &self.functionality, input),
            run_category(&semaphore, &self.connections, input),
            run_category(&semaphore, &self.expressions, input),
            run_category(&semaphore, &self.node_configuration, input),
            run_category(&semaphore, &self.efficiency, input),
            run_category(&semaphore, &self.data_flow, input),
            run_category(&semaphore, &self.maintainability, input),
            run_category(&semaphore, &self.best_practices, input),
        );

        // Settled in declared order so Propagate reports the first failure.
        let mut result = EvaluationResult {
            overall_score: 0.0,
            functionality: self.settle(Category::Functionality, functionality, CategoryResult::degraded)?,
            connections: self.settle(Category::Connections, connections, CategoryResult::degraded)?,
            expressions: self.settle(Category::Expressions, expressions, CategoryResult::degraded)?,
            node_configuration: self.settle(
                Category::NodeConfiguration,
                node_configuration,
                CategoryResult::degraded,
            )?,
            efficiency: self.settle(Category::Efficiency, efficiency, EfficiencyResult::degraded)?,
            data_flow: self.settle(Category::DataFlow, data_flow, CategoryResult::degraded)?,
            maintainability: self.settle(
                Category::Maintainability,
                maintainability,
                MaintainabilityResult::degraded,
            )?,
            best_practices: self.settle(
                Category::BestPractices,
                best_practices,
                BestPracticesResult::degraded,
            )?,
            structural_similarity: self.settle(
                Category::StructuralSimilarity,
                check_structural_similarity(self.comparator.compare(input)),
                StructuralSimilarityResult::degraded,
            )?,
            summary: String::new(),
            critical_issues: None,
        };

        result.overall_score = self.aggregator.aggregate(&result);
        result.summary = self.summary.generate(&result);
        result.critical_issues = self.critical.extract(&result);

        info!(
            overall_score = result.overall_score,
            critical_issues = result.critical_issues.as_ref().map_or(0, Vec::len),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Workflow evaluated"
        );

        Ok(result)
    }

    fn settle<T>(
        &self,
        category: Category,
        outcome: Result<T>,
        degrade: impl FnOnce(&str) -> T,
    ) -> Result<T> {
        match outcome {
            Ok(value) => Ok(value),
            Err(err)
                if self.config.evaluation.failure_policy == FailurePolicy::Isolate
                    && err.is_category_local() =>
            {
                warn!(category = %category, error = %err, "Category evaluation failed, using degraded result");
                Ok(degrade(&err.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

async fn run_category<E: CategoryEvaluator>(
    semaphore: &Semaphore,
    evaluator: &E,
    input: &EvaluationInput,
) -> Result<E::Output> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| FlowgradeError::Other("Failed to acquire semaphore".to_string()))?;

    let category = evaluator.category();
    let started = Instant::now();
    debug!(category = %category, "Evaluating category");

    let outcome = evaluator.evaluate(input).await;

    debug!(
        category = %category,
        success = outcome.is_ok(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Category evaluated"
    );
    outcome
}

/// Builder for [`WorkflowEvaluator`]
pub struct WorkflowEvaluatorBuilder {
    provider: Arc<dyn LLMProvider>,
    config: FlowgradeConfig,
    registry: Option<Arc<BestPracticesRegistry>>,
    categorizer: Option<Arc<dyn PromptCategorizer>>,
    comparator: Option<Arc<dyn StructuralComparator>>,
}

impl WorkflowEvaluatorBuilder {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            config: FlowgradeConfig::default(),
            registry: None,
            categorizer: None,
            comparator: None,
        }
    }

    pub fn config(mut self, config: FlowgradeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.evaluation.failure_policy = policy;
        self
    }

    /// Documentation registry; defaults to [`BestPracticesRegistry::builtin`]
    pub fn registry(mut self, registry: Arc<BestPracticesRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Categorizer; defaults to an [`LLMPromptCategorizer`] on the judge
    pub fn categorizer(mut self, categorizer: Arc<dyn PromptCategorizer>) -> Self {
        self.categorizer = Some(categorizer);
        self
    }

    /// Structural comparator; defaults to [`InapplicableComparator`]
    pub fn comparator(mut self, comparator: Arc<dyn StructuralComparator>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Validate the configuration and bind every category chain
    pub fn build(self) -> Result<WorkflowEvaluator> {
        self.config.validate()?;

        let provider = self.provider;
        let judge = &self.config.judge;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(BestPracticesRegistry::builtin()));
        let categorizer = self.categorizer.unwrap_or_else(|| {
            Arc::new(LLMPromptCategorizer::new(provider.clone(), judge.clone()))
        });

        let evaluator = WorkflowEvaluator {
            functionality: FunctionalityEvaluator::bind(provider.clone(), judge)?,
            connections: ConnectionsEvaluator::bind(provider.clone(), judge)?,
            expressions: ExpressionsEvaluator::bind(provider.clone(), judge)?,
            node_configuration: NodeConfigurationEvaluator::bind(provider.clone(), judge)?,
            efficiency: EfficiencyEvaluator::bind(provider.clone(), judge)?,
            data_flow: DataFlowEvaluator::bind(provider.clone(), judge)?,
            maintainability: MaintainabilityEvaluator::bind(provider.clone(), judge)?,
            best_practices: BestPracticesEvaluator::bind(provider, judge, categorizer, registry)?,
            comparator: self
                .comparator
                .unwrap_or_else(|| Arc::new(InapplicableComparator)),
            aggregator: ScoreAggregator::new(),
            summary: SummaryGenerator::new(),
            critical: CriticalIssueExtractor::new(),
            config: self.config,
        };

        debug!(config = ?evaluator.config, "Workflow evaluator ready");
        Ok(evaluator)
    }
}

/// Grade `input` with `provider` as judge, using default settings
pub async fn evaluate(
    provider: Arc<dyn LLMProvider>,
    input: &EvaluationInput,
) -> Result<EvaluationResult> {
    WorkflowEvaluator::new(provider)?.evaluate(input).await
}
