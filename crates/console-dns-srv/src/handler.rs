//! DNS request handling on top of the zone store.

use async_trait::async_trait;
use console_dns_core::ZoneSet;
use hickory_proto::op::{Header, OpCode, ResponseCode};
use hickory_proto::rr::{Name, Record, RecordType};
use hickory_server::authority::{Catalog, MessageResponse, MessageResponseBuilder};
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::iter;
use std::sync::Arc;
use tracing::{debug, error};

use crate::lookup::{build, resolve, Answer, LookupError};
use crate::store::ZoneStore;

/// How the boundary should respond to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No zone here owns the name; hand the request to the next handler.
    Defer,
    /// The name is ours but holds nothing of the requested type.
    Empty,
    /// Records for the answer and additional sections.
    Answer(Answer),
}

/// Resolve one question against one snapshot.
pub fn dispatch(zones: &ZoneSet, owner: &Name, rtype: RecordType) -> Dispatch {
    match resolve(zones, &owner.to_ascii(), rtype) {
        Ok(resolution) => Dispatch::Answer(build(zones, &resolution, owner)),
        Err(LookupError::ZoneNotFound { .. }) => Dispatch::Defer,
        Err(LookupError::RecordNotFound { .. }) => Dispatch::Empty,
    }
}

/// Authoritative handler answering from the current zone snapshot.
///
/// Names outside every configured zone go to `next` when one is set and get
/// SERVFAIL otherwise.
pub struct ConsoleHandler<N = Catalog> {
    store: Arc<ZoneStore>,
    next: Option<N>,
}

impl ConsoleHandler {
    pub fn new(store: Arc<ZoneStore>) -> Self {
        Self { store, next: None }
    }
}

impl<N: RequestHandler> ConsoleHandler<N> {
    pub fn with_next(store: Arc<ZoneStore>, next: N) -> Self {
        Self {
            store,
            next: Some(next),
        }
    }
}

#[async_trait]
impl<N: RequestHandler> RequestHandler for ConsoleHandler<N> {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        if request.header().op_code() != OpCode::Query {
            return send_error(request, ResponseCode::NotImp, response_handle).await;
        }
        let Some(query) = request.queries().first() else {
            return send_error(request, ResponseCode::FormErr, response_handle).await;
        };

        let owner = query.original().name();
        let rtype = query.query_type();
        // One snapshot for the whole question, glue included.
        let zones = self.store.current();

        match dispatch(&zones, owner, rtype) {
            Dispatch::Defer => match &self.next {
                Some(next) => {
                    debug!(name = %owner, %rtype, "not our zone, passing on");
                    next.handle_request(request, response_handle).await
                }
                None => {
                    debug!(name = %owner, %rtype, "not our zone");
                    send_error(request, ResponseCode::ServFail, response_handle).await
                }
            },
            Dispatch::Empty => {
                debug!(name = %owner, %rtype, "no record of requested type");
                send_answer(request, &Answer::default(), response_handle).await
            }
            Dispatch::Answer(answer) => {
                debug!(
                    name = %owner,
                    %rtype,
                    answers = answer.answers.len(),
                    extras = answer.extras.len(),
                    "answering"
                );
                send_answer(request, &answer, response_handle).await
            }
        }
    }
}

async fn send_answer<R: ResponseHandler>(
    request: &Request,
    answer: &Answer,
    response_handle: R,
) -> ResponseInfo {
    let mut header = Header::response_from_request(request.header());
    header.set_authoritative(true);
    header.set_recursion_available(false);

    let response = MessageResponseBuilder::from_message_request(request).build(
        header,
        answer.answers.iter(),
        iter::empty(),
        iter::empty(),
        answer.extras.iter(),
    );
    send(request, response, response_handle).await
}

async fn send_error<R: ResponseHandler>(
    request: &Request,
    code: ResponseCode,
    response_handle: R,
) -> ResponseInfo {
    let response =
        MessageResponseBuilder::from_message_request(request).error_msg(request.header(), code);
    send(request, response, response_handle).await
}

async fn send<'q, 'a, R, A, N, S, D>(
    request: &Request,
    response: MessageResponse<'q, 'a, A, N, S, D>,
    mut response_handle: R,
) -> ResponseInfo
where
    R: ResponseHandler,
    A: Iterator<Item = &'a Record> + Send + 'a,
    N: Iterator<Item = &'a Record> + Send + 'a,
    S: Iterator<Item = &'a Record> + Send + 'a,
    D: Iterator<Item = &'a Record> + Send + 'a,
{
    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "failed to send response");
            let mut header = Header::response_from_request(request.header());
            header.set_response_code(ResponseCode::ServFail);
            header.into()
        }
    }
}
