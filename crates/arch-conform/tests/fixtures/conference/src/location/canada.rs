//! Location streaming for the Canadian venue. Fixture data only.

pub struct Canada;

impl Canada {
    #[location_info_streamer]
    pub fn send_location_information(&self, id: u64) {}

    #[location_info_streamer]
    pub fn send_location_history(&self, id: u64, event_history: Vec<String>) {}

    #[location_info_streamer]
    pub fn send_location_contract(&self, id: u64, event_history: Vec<String>, contract_number: u32) {
    }

    // 0 arguments: breaks the marker arity rule
    #[location_info_streamer]
    pub fn send_location_ping(&self) {}

    // 4 arguments: breaks the marker arity rule
    #[location_info_streamer]
    pub fn send_location_agreement(
        &self,
        id: u64,
        event_history: Vec<String>,
        contract_number: u32,
        agreement_needed: bool,
    ) {
    }

    pub fn unmarked_helper(&self) {}
}
