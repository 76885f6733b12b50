//! Fake data generation, spread across cores with Rayon.

use chrono::{Datelike, NaiveDate, Utc};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use rollcall_models::Gender;

use super::models::{ClassSeed, StudentSeed, TeacherSeed};

const GENDERS: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

fn full_name() -> String {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    format!("{} {}", first, last)
}

fn gender(rng: &mut impl Rng) -> Gender {
    GENDERS.choose(rng).copied().unwrap_or(Gender::Other)
}

fn contact(rng: &mut impl Rng) -> String {
    format!("{:010}", rng.gen_range(0..10_000_000_000u64))
}

fn date_of_birth(rng: &mut impl Rng, years: std::ops::Range<i32>) -> NaiveDate {
    let year = rng.gen_range(years);
    NaiveDate::from_ymd_opt(year, rng.gen_range(1..=12), rng.gen_range(1..=28))
        .unwrap_or(NaiveDate::MIN)
}

pub fn generate_classes(count: usize, student_limit: i32) -> Vec<ClassSeed> {
    let this_year = Utc::now().year();

    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = rand::thread_rng();
            let city: String = CityName().fake();
            ClassSeed {
                name: format!("{} {}", city, i + 1),
                year: rng.gen_range(this_year - 2..=this_year),
                student_fees: f64::from(rng.gen_range(50..=500) * 10),
                student_limit,
            }
        })
        .collect()
}

/// Emails carry the row index so they stay unique within one run.
pub fn generate_teachers(count: usize) -> Vec<TeacherSeed> {
    let this_year = Utc::now().year();

    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = rand::thread_rng();
            let name = full_name();
            let local = name.to_lowercase().replace(' ', ".");
            TeacherSeed {
                email: format!("{}.{}@rollcall.test", local, i),
                name,
                gender: gender(&mut rng),
                dob: date_of_birth(&mut rng, this_year - 65..this_year - 22),
                contact: contact(&mut rng),
                salary: f64::from(rng.gen_range(300..=900) * 100),
            }
        })
        .collect()
}

pub fn generate_students(count: usize) -> Vec<StudentSeed> {
    let this_year = Utc::now().year();

    (0..count)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::thread_rng();
            StudentSeed {
                name: full_name(),
                gender: gender(&mut rng),
                dob: date_of_birth(&mut rng, this_year - 18..this_year - 5),
                contact: contact(&mut rng),
                fees_paid: f64::from(rng.gen_range(0..=500) * 10),
            }
        })
        .collect()
}
