#![allow(dead_code)]

pub mod expense_testkit;
