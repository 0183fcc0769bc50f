use std::sync::Arc;

use planfeed_service::PlanningSearchService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PlanningSearchService>,
}
impl AppState {
	pub fn new(config: planfeed_config::Config) -> color_eyre::Result<Self> {
		let service = PlanningSearchService::new(config)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: PlanningSearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
