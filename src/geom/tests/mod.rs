mod test_mobius_basic;
