//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the start topic
//! - Dispatching frontier entries to a bounded pool of worker tasks
//! - Persisting articles and index rows as tasks complete
//! - Feeding discovered links back into the frontier
//! - Generating the final report
//!
//! Worker tasks only fetch and parse. Every decision about the frontier, the
//! budget and the output sinks happens in [`Coordinator::run`] between awaiting
//! one completion and dispatching the next batch.

use crate::config::Config;
use crate::crawler::fetcher::{FailureReason, FetchOutcome, PoliteFetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::{PageParser, ParsedArticle, WikiPageParser};
use crate::output::CrawlReport;
use crate::state::{CrawlBudget, CrawlPhase, CrawlState};
use crate::storage::{
    describe_failure, ArticleStore, CrawlIndex, CsvIndex, FileArticleStore, IndexRecord,
};
use crate::url::{seed_url, ArticleFilter};
use crate::{TrawlError, UrlError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinError, JoinSet};

/// What a worker task produced for one entry
#[derive(Debug, Clone)]
pub enum PageResult {
    /// The page was fetched and parsed
    Fetched {
        status: u16,
        attempts: u32,
        article: ParsedArticle,
    },

    /// The page could not be fetched
    Failed {
        last_status: Option<u16>,
        attempts: u32,
        reason: FailureReason,
    },
}

/// A completed task, handed back to the coordinator
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub entry: FrontierEntry,
    pub result: PageResult,
}

impl TaskReport {
    /// Report for a task that died before producing a result
    fn aborted(entry: FrontierEntry) -> Self {
        Self {
            entry,
            result: PageResult::Failed {
                last_status: None,
                attempts: 0,
                reason: FailureReason::WorkerAborted,
            },
        }
    }
}

/// Fetches and parses one entry; runs inside a worker task
async fn process_entry(
    fetcher: Arc<PoliteFetcher>,
    parser: Arc<dyn PageParser>,
    entry: FrontierEntry,
) -> TaskReport {
    let result = match fetcher.fetch(entry.url.as_str()).await {
        FetchOutcome::Success {
            status,
            body,
            attempts,
        } => PageResult::Fetched {
            status,
            attempts,
            article: parser.parse(&body),
        },
        FetchOutcome::Failure {
            last_status,
            attempts,
            reason,
        } => PageResult::Failed {
            last_status,
            attempts,
            reason,
        },
    };

    TaskReport { entry, result }
}

#[derive(Debug, Default)]
struct RunCounters {
    empty: u32,
    failed: u32,
    attempted: u32,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<PoliteFetcher>,
    parser: Arc<dyn PageParser>,
    store: Box<dyn ArticleStore>,
    index: Box<dyn CrawlIndex>,
    state: CrawlState,
    counters: RunCounters,
    /// Entry each running task was dispatched for
    running: HashMap<Id, FrontierEntry>,
}

impl Coordinator {
    /// Creates a coordinator writing to the configured output directory
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TrawlError)` - The seed URL, HTTP client or output sinks could not be set up
    pub fn new(config: &Config) -> Result<Self, TrawlError> {
        let fetcher = PoliteFetcher::from_config(config)?;
        let parser = Arc::new(WikiPageParser::new(&config.site.article_prefix));
        let store = FileArticleStore::create(config.output_directory())?;
        let index = CsvIndex::create(config.index_path())?;

        Self::with_components(config, fetcher, parser, Box::new(store), Box::new(index))
    }

    /// Creates a coordinator from explicit parts
    pub fn with_components(
        config: &Config,
        fetcher: PoliteFetcher,
        parser: Arc<dyn PageParser>,
        store: Box<dyn ArticleStore>,
        index: Box<dyn CrawlIndex>,
    ) -> Result<Self, TrawlError> {
        let seed = seed_url(
            &config.site.base_url,
            &config.site.article_prefix,
            &config.start_topic,
        )?;
        let filter =
            ArticleFilter::new(&seed, &config.site.article_prefix).ok_or(UrlError::MissingHost)?;

        let mut frontier = Frontier::new(filter, config.crawler.max_depth);
        frontier.seed(seed);

        let state = CrawlState::new(
            frontier,
            CrawlBudget::new(config.crawler.page_limit),
            config.crawler.workers.max(1),
        );

        Ok(Self {
            fetcher: Arc::new(fetcher),
            parser,
            store,
            index,
            state,
            counters: RunCounters::default(),
            running: HashMap::new(),
        })
    }

    /// Runs the crawl until the frontier or the budget is exhausted
    ///
    /// Each iteration:
    /// 1. Dispatches as many ready entries as workers and budget allow
    /// 2. Stops once no task is running and nothing can be dispatched
    /// 3. Waits for one task to complete and records its result
    ///
    /// Per-URL failures never end the run; only a failure to write the index does.
    pub async fn run(&mut self) -> Result<CrawlReport, TrawlError> {
        let started_at = Utc::now();
        let mut tasks: JoinSet<TaskReport> = JoinSet::new();
        let mut phase = self.state.phase();

        tracing::info!(
            "Starting crawl (limit {}, max depth {}, {} workers, {} parallel requests)",
            self.state.budget.limit(),
            self.state.frontier.max_depth(),
            self.state.workers(),
            self.fetcher.available_permits()
        );

        loop {
            for entry in self.state.take_dispatchable() {
                let id = self.dispatch(&mut tasks, entry.clone());
                self.running.insert(id, entry);
            }

            let current = self.state.phase();
            if current != phase {
                tracing::debug!(
                    "Phase {} -> {} (saved {}, in flight {}, queued {})",
                    phase,
                    current,
                    self.state.budget.saved(),
                    self.state.budget.in_flight(),
                    self.state.frontier.len()
                );
                phase = current;
            }

            if phase.is_terminal() {
                break;
            }

            match tasks.join_next_with_id().await {
                Some(joined) => self.settle(joined)?,
                None => {
                    tracing::error!(
                        "No tasks left but {} still counted in flight",
                        self.state.budget.in_flight()
                    );
                    break;
                }
            }
        }

        let report = CrawlReport {
            saved: self.state.budget.saved(),
            empty: self.counters.empty,
            failed: self.counters.failed,
            attempted: self.counters.attempted,
            page_limit: self.state.budget.limit(),
            started_at,
            finished_at: Utc::now(),
            index_path: self.index.location().to_path_buf(),
            output_dir: self.store.directory().to_path_buf(),
        };

        tracing::info!(
            "Crawl completed: {} saved, {} failed, {} attempted in {}s",
            report.saved,
            report.failed,
            report.attempted,
            report.duration_seconds()
        );

        Ok(report)
    }

    /// Spawns a worker for one entry
    ///
    /// The worker runs in its own task so a panic inside fetch or parse is
    /// observed as a `JoinError` by the wrapper and turned into a failure report.
    fn dispatch(&self, tasks: &mut JoinSet<TaskReport>, entry: FrontierEntry) -> Id {
        tracing::debug!("Dispatching {} (depth {})", entry.url, entry.depth);

        let worker = tokio::spawn(process_entry(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.parser),
            entry.clone(),
        ));

        tasks
            .spawn(async move {
                match worker.await {
                    Ok(report) => report,
                    Err(err) => {
                        tracing::error!("Worker for {} aborted: {}", entry.url, err);
                        TaskReport::aborted(entry)
                    }
                }
            })
            .id()
    }

    /// Handles one joined task, including a wrapper that was itself cancelled
    /// or panicked
    fn settle(&mut self, joined: Result<(Id, TaskReport), JoinError>) -> Result<(), TrawlError> {
        match joined {
            Ok((id, report)) => {
                self.running.remove(&id);
                self.complete(report)
            }
            Err(err) => {
                tracing::error!("Task supervisor failed: {}", err);
                match self.running.remove(&err.id()) {
                    Some(entry) => self.complete(TaskReport::aborted(entry)),
                    None => {
                        self.state.budget.finish_task();
                        self.counters.failed += 1;
                        Ok(())
                    }
                }
            }
        }
    }

    /// Records one completed task: budget, article file, index row, expansion
    fn complete(&mut self, report: TaskReport) -> Result<(), TrawlError> {
        self.state.budget.finish_task();

        let TaskReport { entry, result } = report;
        let record = match result {
            PageResult::Fetched {
                status,
                attempts,
                article,
            } => {
                tracing::trace!("{} fetched in {} attempt(s)", entry.url, attempts);
                self.complete_success(&entry, status, article)
            }
            PageResult::Failed {
                last_status,
                attempts,
                reason,
            } => {
                tracing::warn!(
                    "Failed {} after {} attempt(s): {}",
                    entry.url,
                    attempts,
                    describe_failure(reason, last_status)
                );
                self.counters.failed += 1;
                IndexRecord::failure(&entry, last_status)
            }
        };

        self.index.record(&record)?;
        self.counters.attempted += 1;
        Ok(())
    }

    fn complete_success(
        &mut self,
        entry: &FrontierEntry,
        status: u16,
        article: ParsedArticle,
    ) -> IndexRecord {
        let out_links = article.links.len();

        if self.state.budget.is_exhausted() {
            tracing::debug!("Budget reached, indexing {} without saving", entry.url);
            return IndexRecord::success(entry, &article.title, status, None, out_links);
        }

        if article.is_empty() {
            self.state.budget.try_accept();
            self.counters.empty += 1;
            tracing::info!(
                "[{}/{}] No content: {}",
                self.state.budget.saved(),
                self.state.budget.limit(),
                entry.url
            );
            return IndexRecord::success(entry, &article.title, status, None, out_links);
        }

        let saved = match self
            .store
            .save(&article.title, entry.url.as_str(), &article.body)
        {
            Ok(saved) => saved,
            Err(err) => {
                tracing::error!("Could not save {}: {}", entry.url, err);
                self.counters.failed += 1;
                return IndexRecord::save_failure(entry, &article.title, out_links);
            }
        };

        self.state.budget.try_accept();
        tracing::info!(
            "[{}/{}] Saved: {}",
            self.state.budget.saved(),
            self.state.budget.limit(),
            display_title(&article.title, &saved.file_name)
        );

        if entry.depth < self.state.frontier.max_depth() {
            let admitted = self.state.expand(&entry.url, entry.depth, &article.links);
            tracing::debug!(
                "{} of {} link(s) from {} admitted",
                admitted,
                out_links,
                entry.url
            );
        }

        IndexRecord::success(entry, &article.title, status, Some(&saved), out_links)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }
}

fn display_title<'a>(title: &'a str, file_name: &'a str) -> &'a str {
    if title.is_empty() {
        file_name
    } else {
        title
    }
}

/// Runs a complete crawl with the configured output sinks
///
/// # Example
///
/// ```no_run
/// use wiki_trawler::config::Config;
/// use wiki_trawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(&Config::for_topic("Machine learning")).await?;
/// println!("Saved {} pages", report.saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, TrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
