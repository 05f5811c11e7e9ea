//! Event hook endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{DataPage, EventHook, EventHookRequest, ResolveResult, VrlScriptTestRequest};

impl ApiClient {
    /// Lists all hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_hooks(&self) -> Result<Vec<EventHook>> {
        let page: DataPage<EventHook> = self.get_json("list-hooks").await?;
        Ok(page.items)
    }

    /// Creates a hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_hook(&self, request: &EventHookRequest) -> Result<EventHook> {
        self.post_json("hook", request).await
    }

    /// Replaces a hook's settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_hook(&self, hook_id: u64, request: &EventHookRequest) -> Result<()> {
        self.put_unit(&format!("hook/{hook_id}"), request).await
    }

    /// Deletes a hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_hook(&self, hook_id: u64) -> Result<()> {
        self.delete_unit(&format!("hook/{hook_id}")).await
    }

    /// Evaluates a VRL program on the server.
    ///
    /// Compile and runtime errors come back inside [`ResolveResult::error`],
    /// not as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn resolve_vrl_script(&self, request: &VrlScriptTestRequest) -> Result<ResolveResult> {
        self.post_json("vrl-script-resolve", request).await
    }
}
