//! Cloudflare integration for the threat intel pipeline.
//! This module resolves account IP lists by name and appends
//! blocked addresses to them.

mod client;
mod lists;

pub use client::{CloudflareClient, CloudflareResponse, IpList, ListItem, ListOperation};
pub use lists::{CloudflareListsManager, ListDirectory, ListMutator};

#[cfg(test)]
pub use lists::{MockListDirectory, MockListMutator};
