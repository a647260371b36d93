// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = ::tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Emits a log event under the `jworg_client` target; compiles to nothing without `tracing`.
#[cfg(feature = "tracing")]
macro_rules! log_event {
	($level:ident, $($arg:tt)+) => {
		::tracing::$level!(target: "jworg_client", $($arg)+)
	};
}
/// Emits a log event under the `jworg_client` target; compiles to nothing without `tracing`.
#[cfg(not(feature = "tracing"))]
macro_rules! log_event {
	($level:ident, $($arg:tt)+) => {{}};
}
pub(crate) use log_event;

/// A span builder used by client flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: ::tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = ::tracing::info_span!("jworg_client.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use ::tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
