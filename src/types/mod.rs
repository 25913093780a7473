mod issue;

pub use issue::Issue;

#[cfg(test)]
pub use issue::make_issue;
