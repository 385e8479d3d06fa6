//! Inbound access logging. Everything under `crate::logging` is excluded
//! from the checks by the fixture configuration; if the exclusion failed,
//! the marked struct below would fault the arity rule and the marked
//! method would violate it.

#[location_info_streamer]
pub struct InboundAccessLog;

impl InboundAccessLog {
    #[location_info_streamer]
    pub fn rule_breaker_method(&self) {}
}
