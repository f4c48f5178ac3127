use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::UnixTimeMs;

pub struct Timer<Ev> {
    context: CapabilityContext<TimerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<Ev> Timer<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, Ev>) -> Self {
        Self { context }
    }

    /// Waits `millis` and reports the wall-clock instant it woke up at.
    /// Not cancellable.
    pub fn sleep<F>(&self, millis: u64, make_event: F)
    where
        F: FnOnce(TimerOutput) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context
                .request_from_shell(TimerOperation::Sleep { millis })
                .await;
            context.update_app(make_event(output));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOperation {
    Sleep { millis: u64 },
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOutput {
    Elapsed { now: UnixTimeMs },
}

impl TimerOutput {
    pub fn now(self) -> UnixTimeMs {
        match self {
            Self::Elapsed { now } => now,
        }
    }
}
