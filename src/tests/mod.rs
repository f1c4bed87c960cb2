mod test_cluster;
mod test_helpers;
