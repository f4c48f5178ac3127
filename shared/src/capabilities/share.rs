use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub struct Share<Ev> {
    context: CapabilityContext<ShareOperation, Ev>,
}

impl<Ev> Capability<Ev> for Share<Ev> {
    type Operation = ShareOperation;
    type MappedSelf<MappedEv> = Share<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Share::new(self.context.map_event(f))
    }
}

impl<Ev> Share<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ShareOperation, Ev>) -> Self {
        Self { context }
    }

    /// Opens the native share sheet.
    pub fn share<F>(&self, content: ShareContent, make_event: F)
    where
        F: FnOnce(ShareResult) -> Ev + Send + 'static,
    {
        self.request(ShareOperation::Share(content), make_event);
    }

    pub fn copy_to_clipboard<F>(&self, text: Option<String>, make_event: F)
    where
        F: FnOnce(ShareResult) -> Ev + Send + 'static,
    {
        self.request(ShareOperation::CopyToClipboard { text }, make_event);
    }

    /// Hands a pre-filled message to the OS mail composer. Fire and forget.
    pub fn compose_email(&self, to: String, subject: String) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(ShareOperation::ComposeEmail { to, subject })
                .await;
        });
    }

    fn request<F>(&self, operation: ShareOperation, make_event: F)
    where
        F: FnOnce(ShareResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareContent {
    pub title: String,
    pub text: String,
    /// `None` lets the shell share its own address.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareOperation {
    Share(ShareContent),
    /// `None` copies the app's own address.
    CopyToClipboard { text: Option<String> },
    ComposeEmail { to: String, subject: String },
}

impl Operation for ShareOperation {
    type Output = ShareResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareError {
    #[error("share sheet unavailable")]
    Unavailable,

    #[error("share cancelled by user")]
    Cancelled,

    #[error("share failed: {reason}")]
    Failed { reason: String },
}

pub type ShareResult = Result<(), ShareError>;
