//! Handler decorators.

mod negotiation;

pub use negotiation::{LanguageNegotiationDecorator, NegotiatedHandler};

pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}
