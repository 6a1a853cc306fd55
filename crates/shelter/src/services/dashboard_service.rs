//! Staff overview of everything waiting for a decision.

use rescatando_database::{
    AdoptionRepository, AdoptionRequestRepository, AdoptionRequestSummary, AdoptionStatus,
    AdoptionSummary, ApplicationStatus, Donation, DonationRepository, FosterHomeRepository,
    InterviewRecord, InterviewRepository, RequestStatus, Volunteer, VolunteerApplication,
    VolunteerApplicationRepository,
};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::errors::ShelterResult;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RequestBoard {
    pub pending: Vec<AdoptionRequestSummary>,
    /// Scheduled and finished interviews.
    pub interview: Vec<AdoptionRequestSummary>,
    pub approved: Vec<AdoptionRequestSummary>,
    pub rejected: Vec<AdoptionRequestSummary>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AdoptionBoard {
    /// `in_progress` and `contract_generated`.
    pub in_process: Vec<AdoptionSummary>,
    pub completed: Vec<AdoptionSummary>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ApplicationBoard {
    pub pending: Vec<VolunteerApplication>,
    pub interview_scheduled: Vec<VolunteerApplication>,
    pub approved: Vec<VolunteerApplication>,
    pub rejected: Vec<VolunteerApplication>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Dashboard {
    pub adoption_requests: RequestBoard,
    pub adoptions: AdoptionBoard,
    pub volunteer_applications: ApplicationBoard,
    /// Active volunteers, available as interviewers.
    pub volunteers: Vec<Volunteer>,
    pub donations: Vec<Donation>,
}

impl RequestBoard {
    fn from_summaries(summaries: Vec<AdoptionRequestSummary>) -> Self {
        let mut board = Self::default();
        for summary in summaries {
            let bucket = match summary.request.status {
                RequestStatus::Pending => &mut board.pending,
                RequestStatus::InterviewScheduled | RequestStatus::InterviewDone => &mut board.interview,
                RequestStatus::Approved => &mut board.approved,
                RequestStatus::Rejected => &mut board.rejected,
            };
            bucket.push(summary);
        }
        board
    }
}

impl AdoptionBoard {
    fn from_summaries(summaries: Vec<AdoptionSummary>) -> Self {
        let (completed, in_process) = summaries
            .into_iter()
            .partition(|s| s.adoption.status == AdoptionStatus::Completed);
        Self {
            in_process,
            completed,
        }
    }
}

impl ApplicationBoard {
    fn from_applications(applications: Vec<VolunteerApplication>) -> Self {
        let mut board = Self {
            total: applications.len(),
            ..Self::default()
        };
        for application in applications {
            let bucket = match application.status {
                ApplicationStatus::Pending => &mut board.pending,
                ApplicationStatus::InterviewScheduled => &mut board.interview_scheduled,
                ApplicationStatus::Approved => &mut board.approved,
                ApplicationStatus::Rejected => &mut board.rejected,
            };
            bucket.push(application);
        }
        board
    }
}

#[derive(Clone)]
pub struct DashboardService {
    requests: AdoptionRequestRepository,
    adoptions: AdoptionRepository,
    applications: VolunteerApplicationRepository,
    donations: DonationRepository,
    homes: FosterHomeRepository,
    interviews: InterviewRepository,
}

impl DashboardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            requests: AdoptionRequestRepository::new(pool.clone()),
            adoptions: AdoptionRepository::new(pool.clone()),
            applications: VolunteerApplicationRepository::new(pool.clone()),
            donations: DonationRepository::new(pool.clone()),
            homes: FosterHomeRepository::new(pool.clone()),
            interviews: InterviewRepository::new(pool),
        }
    }

    pub async fn load(&self) -> ShelterResult<Dashboard> {
        Ok(Dashboard {
            adoption_requests: RequestBoard::from_summaries(self.requests.list_summaries().await?),
            adoptions: AdoptionBoard::from_summaries(self.adoptions.list_summaries().await?),
            volunteer_applications: ApplicationBoard::from_applications(
                self.applications.list_recent_first().await?,
            ),
            volunteers: self.homes.list_volunteers().await?,
            donations: self.donations.list_recent_first().await?,
        })
    }

    pub async fn interviews(&self) -> ShelterResult<Vec<InterviewRecord>> {
        Ok(self.interviews.list_recent_first().await?)
    }
}
