//! Cluster selection for the plot

/// Which clusters are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterFilter {
    #[default]
    All,
    Only(i32),
}

impl ClusterFilter {
    pub fn accepts(&self, cluster: i32) -> bool {
        match self {
            ClusterFilter::All => true,
            ClusterFilter::Only(id) => *id == cluster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts() {
        assert!(ClusterFilter::All.accepts(-1));
        assert!(ClusterFilter::All.accepts(3));
        assert!(ClusterFilter::Only(2).accepts(2));
        assert!(!ClusterFilter::Only(2).accepts(0));
    }
}
