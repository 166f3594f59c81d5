//! Single, concurrent and sequential execution of operations.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{Span, instrument};

use crate::codec::{BerCodec, Codec};
use crate::config::{ManagerBuilder, ManagerConfig};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::oid::Oid;
use crate::operation::Operation;
use crate::outcome::Outcome;
use crate::session::Session;
use crate::transport::{Connector, UdpConnector};
use crate::varbind::VarBind;

/// Executor over UDP with the SNMPv1 BER codec.
pub type Manager = Executor<UdpConnector, BerCodec>;

impl Manager {
    /// Create a builder for a UDP manager.
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }
}

/// How a [`Batch`] is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// All operations in flight at once; results in completion order.
    Concurrent,
    /// One operation at a time in input order.
    #[default]
    Sequential,
}

/// Ordered operations against one endpoint, run once by [`Executor::run`].
#[derive(Debug, Clone)]
pub struct Batch {
    pub mode: ExecutionMode,
    pub operations: Vec<Operation>,
}

impl Batch {
    pub fn new(mode: ExecutionMode, operations: Vec<Operation>) -> Self {
        Self { mode, operations }
    }

    pub fn concurrent(operations: Vec<Operation>) -> Self {
        Self::new(ExecutionMode::Concurrent, operations)
    }

    pub fn sequential(operations: Vec<Operation>) -> Self {
        Self::new(ExecutionMode::Sequential, operations)
    }
}

/// Outcome of one concurrently run operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Position of the operation in the submitted list.
    pub index: usize,
    pub outcome: Outcome,
}

/// Results of [`Executor::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Completion order, tagged with the originating operation.
    Concurrent(Vec<Completion>),
    /// Aligned with the submitted operations.
    Sequential(Vec<Outcome>),
}

impl BatchOutcome {
    /// Number of outcomes.
    pub fn len(&self) -> usize {
        match self {
            BatchOutcome::Concurrent(c) => c.len(),
            BatchOutcome::Sequential(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Outcomes aligned with the submitted operations.
    pub fn into_ordered(self) -> Vec<Outcome> {
        match self {
            BatchOutcome::Sequential(outcomes) => outcomes,
            BatchOutcome::Concurrent(mut completions) => {
                completions.sort_by_key(|c| c.index);
                completions.into_iter().map(|c| c.outcome).collect()
            }
        }
    }
}

/// Runs operations against endpoints.
///
/// Every exchange gets a fresh [`Session`] and its own transport. Nothing is
/// shared between sessions except the configuration, connector and codec.
///
/// # Example
///
/// ```rust,no_run
/// use snmpv1_manager::{Endpoint, Manager, VarBind, oid};
///
/// # async fn example() -> snmpv1_manager::Result<()> {
/// let manager = Manager::builder().community("private").build()?;
/// let agent: Endpoint = "192.0.2.1:161".parse()?;
///
/// let outcome = manager
///     .set(&agent, [VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "A")])
///     .await?;
/// println!("{}", outcome);
/// # Ok(())
/// # }
/// ```
pub struct Executor<C, K> {
    config: ManagerConfig,
    connector: C,
    codec: K,
}

impl<C: Connector, K: Codec> Executor<C, K> {
    pub fn new(config: ManagerConfig, connector: C, codec: K) -> Self {
        Self {
            config,
            connector,
            codec,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Run one operation.
    ///
    /// A timed-out exchange is retried with a fresh session up to
    /// `config.retries` more times. Any other outcome is final.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            snmp.target = %endpoint,
            snmp.kind = %operation.kind(),
            snmp.attempts = tracing::field::Empty,
        )
    )]
    pub async fn execute(&self, endpoint: &Endpoint, operation: &Operation) -> Outcome {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = Session::new(&self.config, &self.connector, &self.codec)
                .execute(endpoint, operation)
                .await;

            let timed_out = outcome.failure().is_some_and(|f| f.is_timeout());
            if timed_out && attempt <= self.config.retries {
                tracing::debug!(
                    target: "snmpv1_manager::executor",
                    { snmp.attempt = attempt, snmp.max_attempts = self.config.retries.saturating_add(1) },
                    "retrying after timeout"
                );
                continue;
            }

            Span::current().record("snmp.attempts", attempt);
            return outcome;
        }
    }

    /// Run all operations at once and collect every outcome.
    ///
    /// Sessions are polled together on the calling task. The result holds one
    /// [`Completion`] per operation, in the order the exchanges finished.
    #[instrument(level = "debug", skip_all, fields(snmp.target = %endpoint, snmp.operations = operations.len()))]
    pub async fn run_concurrent(
        &self,
        endpoint: &Endpoint,
        operations: Vec<Operation>,
    ) -> Vec<Completion> {
        if operations.is_empty() {
            return Vec::new();
        }

        let mut pending: FuturesUnordered<_> = operations
            .iter()
            .enumerate()
            .map(|(index, operation)| async move {
                Completion {
                    index,
                    outcome: self.execute(endpoint, operation).await,
                }
            })
            .collect();

        let mut completions = Vec::with_capacity(operations.len());
        while let Some(completion) = pending.next().await {
            tracing::trace!(
                target: "snmpv1_manager::executor",
                { snmp.index = completion.index, success = completion.outcome.is_success() },
                "operation completed"
            );
            completions.push(completion);
        }
        completions
    }

    /// Run operations one at a time in input order.
    ///
    /// A failed operation does not stop the batch.
    #[instrument(level = "debug", skip_all, fields(snmp.target = %endpoint, snmp.operations = operations.len()))]
    pub async fn run_sequential(
        &self,
        endpoint: &Endpoint,
        operations: Vec<Operation>,
    ) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(operations.len());
        for operation in &operations {
            outcomes.push(self.execute(endpoint, operation).await);
        }
        outcomes
    }

    /// Run a batch in its mode.
    pub async fn run(&self, endpoint: &Endpoint, batch: Batch) -> BatchOutcome {
        match batch.mode {
            ExecutionMode::Concurrent => {
                BatchOutcome::Concurrent(self.run_concurrent(endpoint, batch.operations).await)
            }
            ExecutionMode::Sequential => {
                BatchOutcome::Sequential(self.run_sequential(endpoint, batch.operations).await)
            }
        }
    }

    /// GET the given objects.
    pub async fn get(
        &self,
        endpoint: &Endpoint,
        oids: impl IntoIterator<Item = Oid>,
    ) -> Result<Outcome> {
        let operation = Operation::get(oids)?;
        Ok(self.execute(endpoint, &operation).await)
    }

    /// SET the given bindings.
    pub async fn set(
        &self,
        endpoint: &Endpoint,
        varbinds: impl IntoIterator<Item = VarBind>,
    ) -> Result<Outcome> {
        let operation = Operation::set(varbinds)?;
        Ok(self.execute(endpoint, &operation).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorStatus};
    use crate::oid;
    use crate::transport::{MockConnector, ResponseBuilder};
    use crate::value::Value;
    use std::time::Duration;

    fn endpoint() -> Endpoint {
        Endpoint::new("127.0.0.1", 161).unwrap()
    }

    fn executor(mock: &MockConnector, retries: u32) -> Executor<MockConnector, BerCodec> {
        ManagerBuilder::new()
            .timeout(Duration::from_millis(100))
            .retries(retries)
            .build_with(mock.clone(), BerCodec)
            .unwrap()
    }

    fn sys(n: u32) -> Oid {
        oid!(1, 3, 6, 1, 2, 1, 1).child(n).child(0)
    }

    fn reply(n: u32, value: &str) -> bytes::Bytes {
        ResponseBuilder::new(0)
            .varbind(sys(n), Value::from(value))
            .build(b"public")
    }

    #[tokio::test]
    async fn retries_only_timeouts() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_timeout();
        mock.queue_timeout();
        mock.queue_response(reply(5, "agent"));

        let outcome = executor(&mock, 2)
            .get(&endpoint(), [sys(5)])
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(mock.requests().len(), 3);
        assert_eq!((mock.opened(), mock.released()), (3, 3));
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        let outcome = executor(&mock, 1)
            .get(&endpoint(), [sys(5)])
            .await
            .unwrap();

        assert!(outcome.failure().unwrap().is_timeout());
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn max_retries_with_debug_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_timeout();
        mock.queue_response(reply(5, "agent"));

        let outcome = executor(&mock, u32::MAX)
            .get(&endpoint(), [sys(5)])
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn protocol_errors_are_not_retried() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_response(
            ResponseBuilder::new(0)
                .error_status(ErrorStatus::NoSuchName)
                .error_index(1)
                .varbind(sys(99), Value::Null)
                .build(b"public"),
        );

        let outcome = executor(&mock, 3)
            .get(&endpoint(), [sys(99)])
            .await
            .unwrap();

        assert_eq!(outcome.to_string(), "noSuchName at 1.3.6.1.2.1.1.99.0");
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_replies_are_not_retried() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_raw_response(&b"\x04\x00"[..]);

        let outcome = executor(&mock, 3)
            .get(&endpoint(), [sys(1)])
            .await
            .unwrap();

        assert!(!outcome.is_success());
        assert!(!outcome.failure().unwrap().is_timeout());
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn validation_happens_before_io() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        let executor = executor(&mock, 0);

        let err = executor.get(&endpoint(), Vec::<Oid>::new()).await.unwrap_err();
        assert!(matches!(*err, Error::Validation(_)));

        let err = executor
            .set(&endpoint(), [VarBind::null(sys(5))])
            .await
            .unwrap_err();
        assert!(matches!(*err, Error::Validation(_)));

        assert_eq!(mock.opened(), 0);
    }

    #[tokio::test]
    async fn empty_batches_touch_nothing() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        let executor = executor(&mock, 0);

        assert!(executor.run_concurrent(&endpoint(), vec![]).await.is_empty());
        assert!(executor.run_sequential(&endpoint(), vec![]).await.is_empty());
        assert!(
            executor
                .run(&endpoint(), Batch::concurrent(vec![]))
                .await
                .is_empty()
        );
        assert_eq!(mock.opened(), 0);
    }

    #[tokio::test]
    async fn sequential_continues_past_failures() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_response(reply(1, "first"));
        mock.queue_timeout();
        mock.queue_response(reply(3, "third"));

        let operations = vec![
            Operation::get([sys(1)]).unwrap(),
            Operation::get([sys(2)]).unwrap(),
            Operation::get([sys(3)]).unwrap(),
        ];
        let outcomes = executor(&mock, 0)
            .run_sequential(&endpoint(), operations)
            .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(outcomes[1].failure().unwrap().is_timeout());
        assert_eq!(outcomes[2].varbinds().unwrap()[0].value, Value::from("third"));
        assert_eq!((mock.opened(), mock.released()), (3, 3));
    }

    #[tokio::test]
    async fn concurrent_yields_one_completion_per_operation() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_response(reply(1, "x"));
        mock.queue_response(reply(1, "y"));
        mock.queue_timeout();

        let operations = vec![
            Operation::get([sys(1)]).unwrap(),
            Operation::get([sys(1)]).unwrap(),
            Operation::get([sys(1)]).unwrap(),
        ];
        let completions = executor(&mock, 0)
            .run_concurrent(&endpoint(), operations)
            .await;

        let mut indices: Vec<_> = completions.iter().map(|c| c.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(completions.iter().filter(|c| c.outcome.is_success()).count(), 2);
        assert_eq!((mock.opened(), mock.released()), (3, 3));
    }

    #[tokio::test]
    async fn batch_dispatches_on_mode() {
        let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
        mock.queue_response(reply(5, "A"));

        let outcome = executor(&mock, 0)
            .run(
                &endpoint(),
                Batch::sequential(vec![Operation::get([sys(5)]).unwrap()]),
            )
            .await;

        let BatchOutcome::Sequential(outcomes) = &outcome else {
            panic!("expected sequential outcome");
        };
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcome.into_ordered()[0].to_string(), "1.3.6.1.2.1.1.5.0 = A");
    }

    #[test]
    fn into_ordered_restores_input_order() {
        let ok = |s: &str| Outcome::Success(vec![VarBind::new(sys(5), s)]);
        let outcome = BatchOutcome::Concurrent(vec![
            Completion { index: 1, outcome: ok("b") },
            Completion { index: 0, outcome: ok("a") },
        ]);
        let ordered = outcome.into_ordered();
        assert_eq!(ordered[0], ok("a"));
        assert_eq!(ordered[1], ok("b"));
    }

    #[test]
    fn default_mode_is_sequential() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
    }
}
