#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageFileConfig {
    /// Permission bits for a newly created file. Only applied on Unix.
    pub mode: u32,
    /// Call `sync_data` after every header or page write.
    pub sync_writes: bool,
}

impl Default for PageFileConfig {
    fn default() -> Self {
        PageFileConfig {
            mode: 0o644,
            sync_writes: false,
        }
    }
}

impl PageFileConfig {
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }
}
