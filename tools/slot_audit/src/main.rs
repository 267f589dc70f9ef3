use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use edudash::auth::Credential;
use edudash::config::AppConfig;
use edudash::models::{BusyScheduleUpdate, Teacher};
use edudash::services::slot_grid::SLOT_COUNT;
use edudash::upstream::{ApiClient, HttpTransport, path_for};

fn is_dry_run() -> bool {
    !std::env::args().any(|a| a == "--apply")
}

/// A teacher whose busy schedule holds indices outside the weekly grid.
#[derive(Debug, PartialEq)]
struct Repair<'a> {
    teacher: &'a Teacher,
    stray: Vec<i64>,
    cleaned: Vec<i64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::new_from_env()?;
    let credential = Credential::new(env::var("AUTH_TOKEN")?);

    let transport = Arc::new(HttpTransport::new(&config.api_base_url, config.request_timeout)?);
    let client = ApiClient::new(transport, config.retry);

    // The school API returns the whole teacher list unpaged.
    let teachers: Vec<Teacher> = client.get(&credential, "/teachers", &[]).await?;

    let dry_run = is_dry_run();
    let repairs = plan(&teachers);

    for repair in &repairs {
        let teacher = repair.teacher;
        if dry_run {
            println!(
                "[DRY RUN] Would drop {:?} from {} ({}) -> {:?}",
                repair.stray, teacher.name, teacher.id, repair.cleaned
            );
            continue;
        }

        let body = BusyScheduleUpdate {
            busy_schedule: repair.cleaned.clone(),
        };
        let _: Teacher = client
            .patch(
                &credential,
                &path_for(&["teachers", teacher.id.as_str(), "busy-schedule"])?,
                &body,
            )
            .await?;
        println!(
            "Updated {} ({}) -> {:?}",
            teacher.name, teacher.id, repair.cleaned
        );
    }

    println!(
        "Teachers with off-grid slots: {} / {}",
        repairs.len(),
        teachers.len()
    );

    Ok(())
}

fn plan(teachers: &[Teacher]) -> Vec<Repair<'_>> {
    teachers
        .iter()
        .filter_map(|teacher| {
            let stray = off_grid(&teacher.busy_schedule);
            if stray.is_empty() {
                return None;
            }
            Some(Repair {
                teacher,
                stray,
                cleaned: on_grid(&teacher.busy_schedule),
            })
        })
        .collect()
}

fn in_range(index: i64) -> bool {
    (0..SLOT_COUNT as i64).contains(&index)
}

fn off_grid(busy: &[i64]) -> Vec<i64> {
    busy.iter().copied().filter(|i| !in_range(*i)).collect()
}

fn on_grid(busy: &[i64]) -> Vec<i64> {
    let mut kept: Vec<i64> = busy.iter().copied().filter(|i| in_range(*i)).collect();
    kept.sort_unstable();
    kept.dedup();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher(id: &str, busy: Vec<i64>) -> Teacher {
        Teacher {
            id: id.to_string(),
            name: format!("Teacher {}", id),
            email: None,
            phone: None,
            skills: Vec::new(),
            busy_schedule: busy,
        }
    }

    #[test]
    fn splits_on_and_off_grid_indices() {
        let busy = vec![41, -3, 0, 42, 0];
        assert_eq!(off_grid(&busy), vec![-3, 42]);
        assert_eq!(on_grid(&busy), vec![0, 41]);
    }

    #[test]
    fn plan_covers_every_teacher_in_the_list() {
        let teachers: Vec<Teacher> = (0..25)
            .map(|n| {
                let busy = if n % 5 == 0 { vec![n, 100 + n] } else { vec![n] };
                teacher(&format!("t{}", n), busy)
            })
            .collect();

        let repairs = plan(&teachers);
        let ids: Vec<&str> = repairs.iter().map(|r| r.teacher.id.as_str()).collect();
        assert_eq!(ids, vec!["t0", "t5", "t10", "t15", "t20"]);
        assert_eq!(repairs[4].stray, vec![120]);
        assert_eq!(repairs[4].cleaned, vec![20]);
    }
}
