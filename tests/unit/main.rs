mod test_domain;
