/// Loading flag and most recent fetch error of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl FetchStatus {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }
}
