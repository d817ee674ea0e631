mod task_group_tests;
