//! Chain storage, linking and traversal.
//!
//! # Design Decisions
//! - Stages live in an arena (`Vec`) and refer to their successor by index;
//!   the chain owns every stage, stages own nothing
//! - Links are set only here and validated when set, which keeps the chain
//!   acyclic: a node gets at most one predecessor, at most one successor,
//!   and never itself
//! - The head is fixed at construction; appending only touches the tail

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::chain::handler::{Handler, HandlerFuture, Next};
use crate::concurrency::Cancellation;
use crate::http::{HttpResult, Request, Response};

/// Errors raised while assembling a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("cannot assemble a chain from zero stages")]
    Empty,

    #[error("stage {0} cannot be its own successor")]
    SelfLink(&'static str),

    #[error("stage {0} already has a predecessor")]
    AlreadyLinked(&'static str),

    #[error("stage {0} already has a successor")]
    SuccessorFixed(&'static str),
}

#[derive(Clone)]
struct Node {
    handler: Arc<dyn Handler>,
    next: Option<usize>,
    has_predecessor: bool,
}

impl Node {
    fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            next: None,
            has_predecessor: false,
        }
    }
}

/// An assembled, non-empty sequence of stages.
#[derive(Clone)]
pub struct Chain {
    nodes: Vec<Node>,
    head: usize,
}

impl Chain {
    /// A chain holding a single stage.
    pub fn start_with(handler: impl Handler) -> Self {
        Self {
            nodes: vec![Node::new(Arc::new(handler))],
            head: 0,
        }
    }

    /// Assemble stages in order: the first element becomes the head and each
    /// element delegates to the one after it.
    pub fn from_stages<I>(stages: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        let nodes: Vec<Node> = stages.into_iter().map(Node::new).collect();
        if nodes.is_empty() {
            return Err(ChainError::Empty);
        }

        let mut chain = Self { nodes, head: 0 };
        for index in (1..chain.nodes.len()).rev() {
            chain.link(index - 1, index)?;
        }
        Ok(chain)
    }

    /// Link `handler` after the current tail. The head is unchanged.
    pub fn append(self, handler: impl Handler) -> Result<Self, ChainError> {
        self.append_shared(Arc::new(handler))
    }

    /// Like [`Chain::append`] for a stage that is already shared.
    pub fn append_shared(mut self, handler: Arc<dyn Handler>) -> Result<Self, ChainError> {
        let tail = self.tail();
        self.nodes.push(Node::new(handler));
        let index = self.nodes.len() - 1;
        self.link(tail, index)?;
        Ok(self)
    }

    fn link(&mut self, from: usize, to: usize) -> Result<(), ChainError> {
        if from == to {
            return Err(ChainError::SelfLink(self.nodes[from].handler.name()));
        }
        if self.nodes[from].next.is_some() {
            return Err(ChainError::SuccessorFixed(self.nodes[from].handler.name()));
        }
        if self.nodes[to].has_predecessor || to == self.head {
            return Err(ChainError::AlreadyLinked(self.nodes[to].handler.name()));
        }

        self.nodes[from].next = Some(to);
        self.nodes[to].has_predecessor = true;
        Ok(())
    }

    fn tail(&self) -> usize {
        let mut index = self.head;
        while let Some(next) = self.nodes[index].next {
            index = next;
        }
        index
    }

    fn walk(&self) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(Some(&self.nodes[self.head]), |node| {
            node.next.map(|index| &self.nodes[index])
        })
    }

    /// Stage names from head to tail.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.walk().map(|node| node.handler.name()).collect()
    }

    /// Number of stages reachable from the head.
    pub fn stage_count(&self) -> usize {
        self.walk().count()
    }

    /// Run `request` through the chain starting at the head.
    pub async fn handle(&self, request: Request, cancellation: &Cancellation) -> HttpResult<Response> {
        self.dispatch(self.head, request, cancellation).await
    }

    pub(crate) fn dispatch<'a>(
        &'a self,
        index: usize,
        request: Request,
        cancellation: &'a Cancellation,
    ) -> HandlerFuture<'a> {
        let node = &self.nodes[index];
        let next = Next::new(self, node.next, cancellation);
        node.handler.handle(request, next)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::http::ErrorKind;

    struct Tag {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Handler for Tag {
        async fn handle(&self, request: Request, next: Next<'_>) -> HttpResult<Response> {
            self.log.lock().unwrap().push(format!("enter {}", self.label));
            let result = next.run(request).await;
            self.log.lock().unwrap().push(format!("leave {}", self.label));
            result
        }

        fn name(&self) -> &'static str {
            self.label
        }
    }

    struct Respond;

    #[async_trait]
    impl Handler for Respond {
        async fn handle(&self, request: Request, _next: Next<'_>) -> HttpResult<Response> {
            Ok(Response::new(request, 200u16))
        }
    }

    fn tag(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Tag {
        Tag {
            label,
            log: log.clone(),
        }
    }

    #[test]
    fn test_bulk_matches_incremental() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let stages: Vec<Arc<dyn Handler>> = vec![
            Arc::new(tag("s1", &log)),
            Arc::new(tag("s2", &log)),
            Arc::new(tag("s3", &log)),
        ];
        let bulk = Chain::from_stages(stages).unwrap();

        let incremental = Chain::start_with(tag("s1", &log))
            .append(tag("s2", &log))
            .unwrap()
            .append(tag("s3", &log))
            .unwrap();

        assert_eq!(bulk.stage_names(), vec!["s1", "s2", "s3"]);
        assert_eq!(bulk.stage_names(), incremental.stage_names());
        assert_eq!(bulk.stage_count(), 3);
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let err = Chain::from_stages(Vec::<Arc<dyn Handler>>::new()).unwrap_err();
        assert_eq!(err, ChainError::Empty);
    }

    #[test]
    fn test_link_rejects_cycles() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = Chain::start_with(tag("a", &log)).append(tag("b", &log)).unwrap();

        assert_eq!(chain.link(1, 1), Err(ChainError::SelfLink("b")));
        // The head never gets a predecessor.
        assert_eq!(chain.link(1, 0), Err(ChainError::AlreadyLinked("a")));
        assert_eq!(chain.link(0, 1), Err(ChainError::SuccessorFixed("a")));

        chain.nodes.push(Node::new(Arc::new(tag("c", &log))));
        chain.link(1, 2).unwrap();
        // `c` is now linked; a second predecessor is refused.
        chain.nodes.push(Node::new(Arc::new(tag("d", &log))));
        assert_eq!(chain.link(3, 2), Err(ChainError::AlreadyLinked("c")));
        assert_eq!(chain.stage_names(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_stages_nest_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::start_with(tag("outer", &log))
            .append(tag("inner", &log))
            .unwrap()
            .append(Respond)
            .unwrap();

        let response = chain
            .handle(Request::get("/"), &Cancellation::new())
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter outer", "enter inner", "leave inner", "leave outer"]
        );
    }

    #[tokio::test]
    async fn test_missing_successor_fails_with_configuration_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::start_with(tag("lonely", &log));
        let request = Request::get("/orphan");
        let id = request.id();

        let err = chain.handle(request, &Cancellation::new()).await.unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidConfiguration {
                reason: "Missing handler".to_string()
            }
        );
        assert_eq!(err.request().id(), id);
    }

    #[test]
    fn test_default_stage_name() {
        let chain = Chain::start_with(Respond);
        assert_eq!(chain.stage_names(), vec!["Respond"]);
    }
}
