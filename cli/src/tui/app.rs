use shiftplan_core::model::calendar::MonthRef;
use shiftplan_core::repository::PlannerRepository;
use shiftplan_core::service::dto::PlannerReport;
use shiftplan_core::service::planner_service::PlannerService;
use shiftplan_core::time::Clock;

pub struct App<R: PlannerRepository, C: Clock> {
    service: PlannerService<R, C>,
    pub report: Option<PlannerReport>,
    pub error: Option<String>,
    pub status: Option<String>,
}

impl<R: PlannerRepository, C: Clock> App<R, C> {
    pub fn new(service: PlannerService<R, C>) -> Self {
        let mut app = App {
            service,
            report: None,
            error: None,
            status: None,
        };
        app.refresh(None);
        app
    }

    pub fn current_month(&self) -> Option<MonthRef> {
        self.report.as_ref().map(|report| report.plan.month)
    }

    fn refresh(&mut self, month: Option<MonthRef>) {
        match self.service.compute(month) {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn next_month(&mut self) {
        if let Some(month) = self.current_month().and_then(|m| m.next()) {
            self.refresh(Some(month));
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(month) = self.current_month().and_then(|m| m.previous()) {
            self.refresh(Some(month));
        }
    }

    pub fn jump_to_today(&mut self) {
        if let Some(today) = self.report.as_ref().map(|report| report.today) {
            self.refresh(Some(MonthRef::containing(today)));
        }
    }

    pub fn use_system_time_zone(&mut self) {
        match self.service.use_system_time_zone() {
            Ok(zone) => {
                self.status = Some(format!("Time zone set to {}", zone));
                self.refresh(self.current_month());
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Re-reads the settings file, picking up edits made with `shiftplan set`.
    pub fn reload(&mut self) {
        self.status = None;
        self.refresh(self.current_month());
    }
}
