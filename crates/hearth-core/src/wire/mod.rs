// ── Wire types ──
//
// The JSON shapes exchanged with the assistant: inbound directives and
// outbound responses/events with their context properties.

mod directive;
mod property;
mod response;

pub use directive::{
    Directive, DiscoveryScopePayload, GrantPayload, RangeAdjustPayload, RangeSetPayload,
};
pub use property::ContextProperty;
pub use response::{Response, ResponseBuilder};
