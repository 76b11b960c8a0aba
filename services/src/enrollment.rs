use crate::attendance::NameOrder;
use crate::service::AppError;
use db::models::class_enrollment::{Column, Entity, Model as Enrollment};
use db::models::user::{Column as UserColumn, Entity as UserEntity, Model as User, Role};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, QueryTrait};
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of a bulk enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrollSummary {
    pub enrolled: Vec<i64>,
    /// Ids that were already enrolled.
    pub skipped: Vec<i64>,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls every id in `student_ids` into `class_id`.
    ///
    /// All ids must name existing students; otherwise nothing is written.
    pub async fn enroll(
        db: &DatabaseConnection,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<EnrollSummary, AppError> {
        let wanted: Vec<i64> = {
            let mut seen = HashSet::new();
            student_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
        };
        if wanted.is_empty() {
            return Err(AppError::Validation("student_ids must not be empty".into()));
        }

        let students: HashSet<i64> = UserEntity::find()
            .select_only()
            .column(UserColumn::Id)
            .filter(UserColumn::Id.is_in(wanted.clone()))
            .filter(UserColumn::Role.eq(Role::Student))
            .into_tuple::<i64>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let invalid: Vec<String> = wanted
            .iter()
            .filter(|id| !students.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::Validation(format!(
                "Not students: {}",
                invalid.join(", ")
            )));
        }

        let already: HashSet<i64> = Enrollment::student_ids(db, class_id).await?.into_iter().collect();

        let mut summary = EnrollSummary::default();
        for id in wanted {
            if already.contains(&id) {
                summary.skipped.push(id);
                continue;
            }
            Enrollment::enroll(db, class_id, id).await?;
            summary.enrolled.push(id);
        }

        tracing::info!(
            class_id,
            enrolled = summary.enrolled.len(),
            skipped = summary.skipped.len(),
            "Students enrolled"
        );
        Ok(summary)
    }

    pub async fn unenroll(db: &DatabaseConnection, class_id: i64, student_id: i64) -> Result<(), AppError> {
        if !Enrollment::unenroll(db, class_id, student_id).await? {
            return Err(AppError::NotFound(format!(
                "Student {student_id} is not enrolled in class {class_id}"
            )));
        }
        Ok(())
    }

    pub async fn is_enrolled(db: &DatabaseConnection, class_id: i64, student_id: i64) -> Result<bool, AppError> {
        Ok(Enrollment::is_enrolled(db, class_id, student_id).await?)
    }

    /// Enrolled students sorted by display name.
    pub async fn list_students(db: &DatabaseConnection, class_id: i64) -> Result<Vec<User>, AppError> {
        let ids = Entity::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::ClassId.eq(class_id))
            .into_query();

        let mut students = UserEntity::find()
            .filter(UserColumn::Id.in_subquery(ids))
            .all(db)
            .await?;
        let order = NameOrder::new();
        students.sort_by(|a, b| {
            order
                .compare(a.display_name(), b.display_name())
                .then(a.id.cmp(&b.id))
        });
        Ok(students)
    }
}
