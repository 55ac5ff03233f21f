/// Project persistence over the hosted data service
///
/// Typed CRUD for the `projects` collection plus the project detail view (units and
/// recent tasks). The hosted store is the only source of truth; nothing is cached here.

use crate::db::{DataClient, DbResult, Filters, Query};
use crate::project::types::{NewProject, Project, ProjectOverview, ProjectPatch, Task, Unit};
use uuid::Uuid;

pub const PROJECTS: &str = "projects";
pub const UNITS: &str = "units";
pub const TASKS: &str = "tasks";

/// Number of tasks shown in a project overview
pub const RECENT_TASK_LIMIT: usize = 5;

/// Data-service backed project storage
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    client: DataClient,
}

impl ProjectStorage {
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }

    /// All projects, newest first
    pub async fn list_projects(&self) -> DbResult<Vec<Project>> {
        let query = Query::new("*").order_desc("created_at");
        self.client.select_query(PROJECTS, &query).await
    }

    /// Projects owned by `user_id`, newest first
    pub async fn list_projects_for_user(&self, user_id: Uuid) -> DbResult<Vec<Project>> {
        let query = Query::new("*").eq("user_id", user_id).order_desc("created_at");
        self.client.select_query(PROJECTS, &query).await
    }

    /// Retrieve a project by ID
    pub async fn get_project(&self, id: Uuid) -> DbResult<Option<Project>> {
        let rows: Vec<Project> = self
            .client
            .select(PROJECTS, "*", &Filters::new().eq("id", id))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Insert a project owned by `owner`; returns the stored row
    pub async fn create_project(
        &self,
        owner: Uuid,
        project: &NewProject,
    ) -> DbResult<Option<Project>> {
        let mut record = project.clone();
        record.user_id = Some(owner);

        let rows: Vec<Project> = self.client.insert(PROJECTS, &record).await?;
        Ok(rows.into_iter().next())
    }

    /// Apply a partial update; `None` when no row matched
    pub async fn update_project(
        &self,
        id: Uuid,
        patch: &ProjectPatch,
    ) -> DbResult<Option<Project>> {
        let rows: Vec<Project> = self
            .client
            .update(PROJECTS, patch, &Filters::new().eq("id", id))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Delete a project by ID
    pub async fn delete_project(&self, id: Uuid) -> DbResult<()> {
        let _: Vec<serde_json::Value> = self
            .client
            .delete(PROJECTS, &Filters::new().eq("id", id))
            .await?;
        Ok(())
    }

    /// Project with its units and latest tasks; `None` when the project does not exist
    pub async fn project_overview(&self, id: Uuid) -> DbResult<Option<ProjectOverview>> {
        let Some(project) = self.get_project(id).await? else {
            return Ok(None);
        };

        let units_query = Query::new("*").eq("project_id", id);
        let tasks_query = Query::new("*")
            .eq("project_id", id)
            .order_desc("created_at")
            .limit(RECENT_TASK_LIMIT);

        let (units, recent_tasks) = tokio::try_join!(
            self.client.select_query::<Unit>(UNITS, &units_query),
            self.client.select_query::<Task>(TASKS, &tasks_query),
        )?;

        Ok(Some(ProjectOverview {
            project,
            units,
            recent_tasks,
        }))
    }
}
