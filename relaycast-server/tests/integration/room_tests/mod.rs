mod test_viewer_admission;
